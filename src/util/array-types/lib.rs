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

//! A small fixed-size vector type for cartesian quantities.
//!
//! Positions, bond vectors and forces all travel through the potentials as `V3`.
//! The type is a transparent wrapper around `[X; 3]`, so anything that works on
//! arrays works on it through `Deref`.

mod types;
mod ops;
mod methods_v;

pub use crate::types::V3;
pub use crate::methods_v::dot;
