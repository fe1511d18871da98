/// Receiver side of a channel subscription, for types that keep their own state
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
