const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner advanced once per UI tick
#[derive(Debug, Default)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    pub fn current(&self) -> &'static str {
        FRAMES[self.frame]
    }

    /// "<frame> Loading <what>..."
    pub fn label(&self, what: &str) -> String {
        format!("{} Loading {what}...", self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_after_last_frame() {
        let mut spinner = Spinner::default();
        for _ in 0..FRAMES.len() {
            spinner.tick();
        }
        assert_eq!(spinner.current(), FRAMES[0]);
        assert_eq!(spinner.label("teams"), "⠋ Loading teams...");
    }
}
