/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

use rsp2_array_types::V3;

use std::fmt;

/// A term whose geometry produced a cosine well outside of `[-1, 1]`.
///
/// The term is still evaluated (with the cosine clamped); this only exists so
/// that somebody can be told about it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImproperProblem {
    pub thread: usize,
    pub timestep: u64,
    /// Identifiers of the four sites. (the indices, if no tags were supplied)
    pub tags: [usize; 4],
    /// Raw coordinates of the four sites, without boundary correction.
    pub positions: [V3; 4],
    /// The offending cosine, before clamping.
    pub cosine: f64,
}

impl fmt::Display for ImproperProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [t1, t2, t3, t4] = self.tags;
        write!(f, "Improper problem: {} {} {} {} {} {}", self.thread, self.timestep, t1, t2, t3, t4)?;
        for (ordinal, pos) in ["1st", "2nd", "3rd", "4th"].iter().zip(&self.positions) {
            write!(f, "\n  {} atom: {} {} {}", ordinal, pos[0], pos[1], pos[2])?;
        }
        Ok(())
    }
}

/// Receives reports of ill-conditioned terms.
///
/// Reports may arrive from any worker thread, and must never abort the computation.
pub trait Diagnostics: Sync {
    fn improper_problem(&self, problem: &ImproperProblem);
}

/// Emits each problem as a warning through `log`.
#[derive(Debug, Copy, Clone, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn improper_problem(&self, problem: &ImproperProblem) {
        warn!("{}", problem);
    }
}

impl<F> Diagnostics for F
where F: Fn(&ImproperProblem) + Sync,
{
    fn improper_problem(&self, problem: &ImproperProblem) { self(problem) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_layout() {
        let problem = ImproperProblem {
            thread: 2,
            timestep: 150,
            tags: [11, 12, 13, 14],
            positions: [
                V3([0.0, 0.0, 0.0]),
                V3([1.0, 0.0, 0.0]),
                V3([1.0, 1.5, 0.0]),
                V3([1.0, 1.0, -2.0]),
            ],
            cosine: 1.2,
        };
        assert_eq!(problem.to_string(), "\
Improper problem: 2 150 11 12 13 14
  1st atom: 0 0 0
  2nd atom: 1 0 0
  3rd atom: 1 1.5 0
  4th atom: 1 1 -2");
    }

    #[test]
    fn closures_are_sinks() {
        use std::sync::Mutex;

        let seen = Mutex::new(vec![]);
        let sink = |problem: &ImproperProblem| seen.lock().unwrap().push(problem.tags);
        let problem = ImproperProblem {
            thread: 0,
            timestep: 0,
            tags: [0, 1, 2, 3],
            positions: [V3::zero(); 4],
            cosine: -2.0,
        };
        sink.improper_problem(&problem);
        LogDiagnostics.improper_problem(&problem);
        assert_eq!(seen.into_inner().unwrap(), vec![[0, 1, 2, 3]]);
    }
}
