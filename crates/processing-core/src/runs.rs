//! Run compaction over sorted second lists.
//!
//! A run is a maximal stretch of a sorted list whose neighbours differ by
//! exactly the sampling interval. Transitions keep every run with its
//! length; events keep only the first second of each run.

use serde::Serialize;

use crate::sample_clock::TimestampSecond;

/// A maximal run of consecutive sampled seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run {
    pub start_secs: TimestampSecond,
    /// Samples in the run, always at least 1.
    pub member_count: u32,
}

impl Run {
    /// The second at which the run is over and gameplay resumes.
    pub fn end_secs(&self) -> TimestampSecond {
        self.start_secs + self.member_count
    }
}

fn continues(prev: TimestampSecond, next: TimestampSecond, interval: u32) -> bool {
    next.checked_sub(prev) == Some(interval)
}

/// Keep the earliest second of every run. `sorted` must be ascending.
pub fn dedup(sorted: &[TimestampSecond], interval: u32) -> Vec<TimestampSecond> {
    debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

    let mut result = Vec::new();
    let mut prev: Option<TimestampSecond> = None;
    for &second in sorted {
        match prev {
            Some(p) if continues(p, second, interval) => {}
            _ => result.push(second),
        }
        prev = Some(second);
    }
    result
}

/// Split `sorted` into runs, in ascending order. An empty input yields no runs.
pub fn runs_of(sorted: &[TimestampSecond], interval: u32) -> Vec<Run> {
    debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

    let mut runs = Vec::new();
    let mut iter = sorted.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut last = start;
        let mut member_count = 1;
        while let Some(&next) = iter.peek() {
            if !continues(last, next, interval) {
                break;
            }
            last = next;
            member_count += 1;
            iter.next();
        }
        runs.push(Run {
            start_secs: start,
            member_count,
        });
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_run_heads() {
        assert_eq!(dedup(&[1, 2, 3, 10, 11], 1), vec![1, 10]);
    }

    #[test]
    fn test_dedup_respects_interval() {
        assert_eq!(dedup(&[2, 4, 6, 7, 20], 2), vec![2, 7, 20]);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup(&[], 1).is_empty());
    }

    #[test]
    fn test_duplicate_seconds_break_runs() {
        assert_eq!(dedup(&[5, 5, 6], 1), vec![5, 5]);
        assert_eq!(
            runs_of(&[5, 5, 6], 1),
            vec![
                Run {
                    start_secs: 5,
                    member_count: 1
                },
                Run {
                    start_secs: 5,
                    member_count: 2
                },
            ]
        );
    }

    #[test]
    fn test_runs_of_counts_members() {
        let runs = runs_of(&[40, 41, 42, 610, 611, 612, 900], 1);
        assert_eq!(
            runs,
            vec![
                Run {
                    start_secs: 40,
                    member_count: 3
                },
                Run {
                    start_secs: 610,
                    member_count: 3
                },
                Run {
                    start_secs: 900,
                    member_count: 1
                },
            ]
        );
        assert_eq!(runs[0].end_secs(), 43);
    }

    #[test]
    fn test_runs_of_single_element() {
        assert_eq!(
            runs_of(&[7], 1),
            vec![Run {
                start_secs: 7,
                member_count: 1
            }]
        );
    }

    #[test]
    fn test_runs_of_empty_is_empty() {
        assert!(runs_of(&[], 1).is_empty());
    }
}
