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

#[macro_use] extern crate failure;
#[macro_use] extern crate log;
#[macro_use] extern crate serde_derive;
#[cfg(test)] #[macro_use] extern crate rsp2_assert_close;

pub type FailResult<T> = Result<T, failure::Error>;

mod cmd;
mod env;
mod traits;
mod ui;

pub mod entry_points;
pub mod filetypes;

pub use crate::cmd::{run_improper, run_improper_files, resolve_threading};
pub use crate::traits::{Load, Save, Json};
pub use crate::ui::logging::GlobalLogger;
