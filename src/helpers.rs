pub trait Capitalize {
    /// First character upper case, the rest lower case
    fn capitalize(&self) -> String;
}

impl Capitalize for str {
    fn capitalize(&self) -> String {
        let mut chars = self.chars();
        chars
            .next()
            .map(|first| first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!("normal".capitalize(), "Normal");
        assert_eq!("hARD".capitalize(), "Hard");
        assert_eq!("".capitalize(), "");
    }
}
