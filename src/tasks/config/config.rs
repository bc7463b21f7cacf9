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

// NOTE: Please make sure to use the YamlRead trait when deserializing these types!
//
//       DO NOT USE serde_yaml::from_{reader,value,etc.} OUTSIDE THIS CRATE
//       or else you defeat the entire reason for YamlRead's existence.

use serde::de;

/// Root settings object.
///
/// This is what you should deserialize.
#[derive(Serialize)]
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings(pub Settings);

/// Raw deserialized form of settings.
///
/// You shouldn't deserialize this type directly; deserialize `ValidatedSettings` instead,
/// so that additional validation can be performed.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default)]
    pub threading: Threading,

    /// Whether forces on ghost sites are kept.
    ///
    /// When `false`, each term only contributes to the sites that this process owns,
    /// and the owner of a ghost site is expected to compute the term as well.
    #[serde(default = "_settings__newton_bond")]
    pub newton_bond: bool,

    /// Which tallies to accumulate.  Forces are always computed.
    #[serde(default)]
    pub compute: Compute,

    /// Coefficients for each improper type, indexed by type id.
    pub coeffs: Vec<Coeff>,
}
fn _settings__newton_bond() -> bool { true }

derive_yaml_read!{ValidatedSettings}

impl<'de> de::Deserialize<'de> for ValidatedSettings {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cereal: Settings = de::Deserialize::deserialize(deserializer)?;

        cereal.validate().map_err(de::Error::custom)
    }
}

impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;

    fn deref(&self) -> &Settings { &self.0 }
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Threading {
    /// Number of threads in the team.
    ///
    /// Defaults to `OMP_NUM_THREADS` if it is set, and otherwise 1.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Run the team on rayon's thread pool.
    ///
    /// When `false`, the threads are run one after another. Results are the same
    /// either way, as every thread accumulates into its own buffers.
    #[serde(default = "_threading__rayon")]
    pub rayon: bool,
}
fn _threading__rayon() -> bool { true }

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Compute {
    #[serde(default)]
    pub energy: bool,
    #[serde(default)]
    pub virial: bool,
    #[serde(default)]
    pub per_site_energy: bool,
    #[serde(default)]
    pub per_site_virial: bool,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Coeff {
    /// Force constant, in energy per squared radian.
    pub k: f64,
    /// Equilibrium angle, in degrees.
    pub chi: f64,
}

// --------------------------------------------------------

impl Default for Threading {
    fn default() -> Self {
        Threading { threads: None, rayon: _threading__rayon() }
    }
}
