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

//! Environment variables read by rsp2.

use crate::FailResult;
use std::env;

fn var(key: &str) -> FailResult<Option<String>>
{ match env::var(key) {
    Ok(s) => Ok(Some(s)),
    Err(env::VarError::NotPresent) => Ok(None),
    Err(env::VarError::NotUnicode(s)) => bail!("env var not unicode: {}={:?}", key, s),
}}

fn nonempty_var(key: &str) -> FailResult<Option<String>>
{ match var(key) {
    Ok(Some(ref s)) if s.trim().is_empty() => Ok(None),
    r => r,
}}

/// The size of the outermost thread team requested through `OMP_NUM_THREADS`, if any.
pub fn omp_num_threads() -> FailResult<Option<usize>>
{
    match nonempty_var("OMP_NUM_THREADS")? {
        None => Ok(None),
        Some(s) => parse_omp_num_threads(&s).map(Some),
    }
}

// (the variable may be a comma-separated list, one entry per level of nesting)
fn parse_omp_num_threads(s: &str) -> FailResult<usize>
{
    let first = s.split(',').next().unwrap_or("").trim();
    match first.parse::<usize>() {
        Ok(0) | Err(_) => bail!("Invalid setting for OMP_NUM_THREADS: {:?}", s),
        Ok(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omp_num_threads_syntax() {
        assert_eq!(parse_omp_num_threads("4").unwrap(), 4);
        assert_eq!(parse_omp_num_threads(" 8 ").unwrap(), 8);
        assert_eq!(parse_omp_num_threads("6,2").unwrap(), 6);
        assert!(parse_omp_num_threads("0").is_err());
        assert!(parse_omp_num_threads("four").is_err());
        assert!(parse_omp_num_threads(",4").is_err());
    }
}
