//! Single-line textual progress bar.

use std::io::{self, Write};

/// Number of cells between the brackets.
pub const BAR_WIDTH: u32 = 50;

/// Redraws a carriage-return progress bar whenever the percentage changes.
#[derive(Debug)]
pub struct ProgressReporter<W: Write> {
    out: W,
    last_percent: u32,
    redraws: u64,
    line_open: bool,
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_percent: 0,
            redraws: 0,
            line_open: false,
        }
    }

    /// Draw the bar at `percent`; `finalize` ends the line.
    pub fn render(&mut self, percent: u32, finalize: bool) -> io::Result<()> {
        write!(self.out, "\r{}", render_bar(percent))?;
        if finalize {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        self.redraws += 1;
        self.line_open = !finalize;
        Ok(())
    }

    /// Redraw only when `percent` differs from the last drawn value.
    pub fn advance(&mut self, percent: u32) -> io::Result<bool> {
        if percent == self.last_percent {
            return Ok(false);
        }
        self.last_percent = percent;
        self.render(percent, false)?;
        Ok(true)
    }

    /// Progress after finishing object `index` of `total`.
    pub fn update(&mut self, index: u64, total: u64) -> io::Result<bool> {
        if total == 0 {
            return Ok(false);
        }
        let percent = (index.saturating_mul(100) / total).min(100) as u32;
        self.advance(percent)
    }

    /// Final 100% redraw followed by a newline; resets for the next run.
    pub fn finish(&mut self) -> io::Result<()> {
        self.render(100, true)?;
        self.last_percent = 0;
        Ok(())
    }

    /// End a partially drawn bar without completing it; resets for the next run.
    pub fn abort(&mut self) -> io::Result<()> {
        self.last_percent = 0;
        if self.line_open {
            self.line_open = false;
            writeln!(self.out)?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `[====>     ]   42%` style bar, without the leading carriage return.
///
/// Percentages above 100 are printed as given with a full bar.
pub fn render_bar(percent: u32) -> String {
    let head = percent / 2;
    let mut line = String::with_capacity(BAR_WIDTH as usize + 16);
    line.push('[');
    for cell in 0..BAR_WIDTH {
        let symbol = if cell < head {
            '='
        } else if cell == head {
            '>'
        } else {
            ' '
        };
        line.push(symbol);
    }
    line.push_str(&format!("]   {percent}%     "));
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_marks_head_position() {
        let bar = render_bar(10);
        assert_eq!(bar.len(), 1 + 50 + 1 + "   10%     ".len());
        assert!(bar.starts_with("[=====>"));
        assert!(bar.ends_with("]   10%     "));

        let full = render_bar(100);
        assert!(full.starts_with(&format!("[{}]", "=".repeat(50))));

        let empty = render_bar(0);
        assert!(empty.starts_with("[>"));
    }

    #[test]
    fn out_of_range_percent_is_printed_as_given() {
        let bar = render_bar(150);
        assert!(bar.starts_with(&format!("[{}]", "=".repeat(50))));
        assert!(bar.ends_with("]   150%     "));
    }

    #[test]
    fn abort_ends_open_line_and_resets() {
        let mut reporter = ProgressReporter::new(Vec::new());
        reporter.advance(40).expect("advance");
        reporter.abort().expect("abort");
        reporter.abort().expect("abort twice");
        assert!(reporter.advance(40).expect("advance after abort"));

        let output = String::from_utf8(reporter.into_inner()).expect("utf8");
        assert_eq!(output.matches('\n').count(), 1);
        assert!(output.contains("]   40%     \n\r["));
    }

    #[test]
    fn abort_without_drawing_writes_nothing() {
        let mut reporter = ProgressReporter::new(Vec::new());
        reporter.abort().expect("abort");
        assert!(reporter.into_inner().is_empty());
    }

    #[test]
    fn repeated_percentages_are_not_redrawn() {
        let mut reporter = ProgressReporter::new(Vec::new());
        for percent in [0, 0, 20, 20, 20, 40, 40, 10] {
            reporter.advance(percent).expect("advance");
        }
        assert_eq!(reporter.redraws(), 3);
    }

    #[test]
    fn finish_writes_single_trailing_newline() {
        let mut reporter = ProgressReporter::new(Vec::new());
        for index in 0..4 {
            reporter.update(index, 4).expect("update");
        }
        reporter.finish().expect("finish");

        let output = String::from_utf8(reporter.into_inner()).expect("utf8");
        assert_eq!(output.matches('\n').count(), 1);
        assert!(output.ends_with("]   100%     \n"));
        assert_eq!(output.matches('\r').count(), 4);
    }

    #[test]
    fn empty_run_only_draws_completion() {
        let mut reporter = ProgressReporter::new(Vec::new());
        assert!(!reporter.update(0, 0).expect("update"));
        reporter.finish().expect("finish");
        assert_eq!(reporter.redraws(), 1);
    }
}
