//! Line-oriented pass/fail output

use crate::runner::Verdict;
use crate::testfile::{AccessTest, GroupTest};
use std::io::{self, Write};

/// Failure counts for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub failed_access_tests: usize,
    pub failed_group_tests: usize,
}

impl Summary {
    pub fn passed(&self) -> bool {
        self.failed_access_tests == 0 && self.failed_group_tests == 0
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

/// Writes test progress and results, counting failures as it goes
pub struct Reporter<W: Write> {
    out: W,
    summary: Summary,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            summary: Summary::default(),
        }
    }

    pub fn users_loading(&mut self) -> io::Result<()> {
        writeln!(self.out, "retrieving users for email address lookups...")
    }

    pub fn users_loaded(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out, "retrieved {} users", count)
    }

    pub fn access_section(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out, "\n\n-------------- ACCESS TESTS --------------")?;
        writeln!(self.out, "running {} access tests...", count)
    }

    pub fn access_result(&mut self, test: &AccessTest, verdict: &Verdict) -> io::Result<()> {
        let description = format!(
            "{} {} to {} with role {}",
            test.user, test.expected_result, test.target, test.role
        );
        if verdict.is_failure() {
            self.summary.failed_access_tests += 1;
        }
        self.write_verdict(&description, verdict)
    }

    pub fn group_section(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out, "\n\n-------------- GROUP MEMBERSHIP TESTS --------------")?;
        writeln!(self.out, "running {} group membership tests...", count)
    }

    pub fn group_result(&mut self, test: &GroupTest, verdict: &Verdict) -> io::Result<()> {
        let description = format!("{} {} {}", test.user, test.membership_text(), test.group);
        if verdict.is_failure() {
            self.summary.failed_group_tests += 1;
        }
        self.write_verdict(&description, verdict)
    }

    /// Print the per-section totals and return the counts
    pub fn summary(&mut self) -> io::Result<Summary> {
        let summary = self.summary;

        if summary.failed_access_tests > 0 {
            writeln!(
                self.out,
                "\n\n{} Access Tests failed",
                summary.failed_access_tests
            )?;
        } else {
            writeln!(self.out, "\n\nAll Access Tests passed")?;
        }

        if summary.failed_group_tests > 0 {
            writeln!(
                self.out,
                "\n{} Group Membership Tests failed",
                summary.failed_group_tests
            )?;
        } else {
            writeln!(self.out, "\nAll Group Membership Tests passed")?;
        }

        self.out.flush()?;
        Ok(summary)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_verdict(&mut self, description: &str, verdict: &Verdict) -> io::Result<()> {
        match verdict {
            Verdict::Passed => writeln!(self.out, "[PASS] {}", description),
            Verdict::PassedWithWarning(warning) => {
                writeln!(self.out, "[WARN] {}", warning)?;
                writeln!(self.out, "[PASS] {}", description)
            }
            Verdict::Failed(reason) => writeln!(self.out, "[FAIL] {}: {}", description, reason),
        }
    }
}
