/// Implemented by types holding channel subscriptions that must be released by hand
pub trait Destroyable {
    fn destroy(&mut self);
}
