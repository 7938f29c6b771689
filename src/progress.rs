use std::io::{self, Write};

/// Status reporting for the long-running steps (pagination, enrichment,
/// writing). Every method defaults to doing nothing.
pub trait Progress {
    /// Called before the counted phase starts, with the number of items.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status or diagnostic line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called after each item completes.
    fn item_done(&mut self, _done: usize, _total: usize) {}

    /// Called when the counted phase ends.
    fn finish(&mut self) {}
}

/// Renders the member counter in place with `\r`.
pub struct ConsoleProgress<W: Write> {
    out: W,
    counting: bool,
}

impl ConsoleProgress<io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleProgress::new(io::stdout())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        ConsoleProgress {
            out,
            counting: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

// Write errors on the terminal are ignored.
impl<W: Write> Progress for ConsoleProgress<W> {
    fn begin(&mut self, _total: usize) {
        let _ = write!(self.out, "Get members infos...");
        let _ = self.out.flush();
        self.counting = true;
    }

    fn log(&mut self, msg: &str) {
        if self.counting {
            let _ = writeln!(self.out);
        }
        let _ = writeln!(self.out, "{msg}");
        let _ = self.out.flush();
    }

    fn item_done(&mut self, done: usize, total: usize) {
        let _ = write!(self.out, "\rGet members infos ({done}/{total})...");
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        if self.counting {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
            self.counting = false;
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::Progress;

    /// Captures everything a run reports.
    #[derive(Default)]
    pub struct RecordingProgress {
        pub lines: Vec<String>,
        pub counts: Vec<(usize, usize)>,
        pub began: Option<usize>,
        pub finished: bool,
    }

    impl Progress for RecordingProgress {
        fn begin(&mut self, total: usize) {
            self.began = Some(total);
        }

        fn log(&mut self, msg: &str) {
            self.lines.push(msg.to_string());
        }

        fn item_done(&mut self, done: usize, total: usize) {
            self.counts.push((done, total));
        }

        fn finish(&mut self) {
            self.finished = true;
        }
    }
}
