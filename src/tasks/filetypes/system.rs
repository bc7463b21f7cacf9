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
use rsp2_potentials::improper::{OrthoBox, Term};

/// A set of sites and the improper terms between them.
///
/// ```json
/// {
///   "positions": [[0, 0, 0], [1, 0, 0], [1, 1, 0], [1, 1, 1]],
///   "tags": [1, 2, 3, 4],
///   "nlocal": 4,
///   "box": { "lengths": [10, 10, 10], "periodic": [true, true, false] },
///   "timestep": 0,
///   "terms": [{ "sites": [0, 1, 2, 3], "type": 0 }]
/// }
/// ```
///
/// Everything but `positions` and `terms` is optional.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SystemJson {
    /// Owned sites first, followed by ghosts.
    pub positions: Vec<V3>,

    /// Identifiers shown in warnings.  Defaults to the indices.
    #[serde(default)]
    pub tags: Option<Vec<usize>>,

    /// The number of owned sites.  Defaults to all of them.
    #[serde(default)]
    pub nlocal: Option<usize>,

    /// Orthogonal periodic cell.  Bonds are used as-is if this is absent.
    #[serde(default, rename = "box")]
    pub cell: Option<BoxJson>,

    #[serde(default)]
    pub timestep: u64,

    pub terms: Vec<Term>,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct BoxJson {
    pub lengths: [f64; 3],
    #[serde(default = "_box__periodic")]
    pub periodic: [bool; 3],
}
#[allow(non_snake_case)]
fn _box__periodic() -> [bool; 3] { [true; 3] }

impl SystemJson {
    pub fn nlocal(&self) -> usize {
        self.nlocal.unwrap_or(self.positions.len())
    }

    pub fn tags(&self) -> Option<&[usize]> {
        self.tags.as_ref().map(|tags| &tags[..])
    }
}

impl BoxJson {
    pub fn to_ortho_box(&self) -> OrthoBox {
        OrthoBox { lengths: V3(self.lengths), periodic: self.periodic }
    }
}
