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

use crate::FailResult;

use path_abs::{FileRead, FileWrite};
use std::path::Path;

pub trait Load: Sized {
    fn load<P>(path: P) -> FailResult<Self> where P: AsRef<Path>;
}

pub trait Save {
    fn save<P>(&self, path: P) -> FailResult<()> where P: AsRef<Path>;
}

/// Utility adapter for `Load`/`Save` that serializes as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Json<T: ?Sized>(pub T);

impl<T> Load for Json<T> where T: for<'de> serde::Deserialize<'de> {
    fn load<P: AsRef<Path>>(path: P) -> FailResult<Json<T>>
    {Ok(serde_json::from_reader(FileRead::open(path.as_ref())?)?).map(Json)}
}

impl<T> Save for Json<T> where T: serde::Serialize {
    fn save<P: AsRef<Path>>(&self, path: P) -> FailResult<()>
    {Ok(serde_json::to_writer_pretty(FileWrite::create(path.as_ref())?, &self.0)?)}
}

// Direct parsing of yaml must be done in extreme moderation due to compile times.
// (use rsp2_tasks_config::YamlRead instead)
