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
use rsp2_potentials::improper::{Totals, Virial};

/// Output of a pass over the improper terms.
///
/// Forces are given for every site, ghosts included.  Virials are in the order
/// `xx, yy, zz, xy, xz, yz`.  The per-site arrays are only present if they were requested.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ForcesJson {
    pub energy: f64,
    pub virial: Virial,
    pub forces: Vec<V3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_energy: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_virial: Option<Vec<Virial>>,
}

impl From<Totals> for ForcesJson {
    fn from(totals: Totals) -> Self {
        let Totals { energy, virial, forces, site_energy, site_virial } = totals;
        ForcesJson { energy, virial, forces, site_energy, site_virial }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let forces = ForcesJson {
            energy: 1.5,
            virial: [0.0; 6],
            forces: vec![V3([1.0, 2.0, 3.0])],
            site_energy: None,
            site_virial: None,
        };
        let json = serde_json::to_value(&forces).unwrap();
        assert_eq!(json, serde_json::json!({
            "energy": 1.5,
            "virial": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            "forces": [[1.0, 2.0, 3.0]]
        }));

        let back: ForcesJson = serde_json::from_value(json).unwrap();
        assert_eq!(back, forces);
    }

    #[test]
    fn per_site_fields() {
        let forces = ForcesJson {
            energy: 0.0,
            virial: [0.0; 6],
            forces: vec![],
            site_energy: Some(vec![0.25]),
            site_virial: Some(vec![[1.0; 6]]),
        };
        let json = serde_json::to_value(&forces).unwrap();
        assert_eq!(json["site-energy"], serde_json::json!([0.25]));
        assert_eq!(json["site-virial"][0][5], serde_json::json!(1.0));
    }
}
