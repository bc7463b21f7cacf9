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

//! Checks that are performed after deserialization.

use crate::config::*;
use failure::Error;

impl Settings {
    pub fn validate(self) -> Result<ValidatedSettings, Error> {
        ensure!(!self.coeffs.is_empty(), "at least one improper type needs coefficients");

        for (type_id, Coeff { k, chi }) in self.coeffs.iter().enumerate() {
            ensure!(k.is_finite(), "coeffs[{}]: k must be finite (got {})", type_id, k);
            ensure!(chi.is_finite(), "coeffs[{}]: chi must be finite (got {})", type_id, chi);
        }

        if self.threading.threads == Some(0) {
            bail!("threading.threads must be at least 1");
        }

        Ok(ValidatedSettings(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            threading: Threading::default(),
            newton_bond: true,
            compute: Compute::default(),
            coeffs: vec![Coeff { k: 1.0, chi: 0.0 }],
        }
    }

    #[test]
    fn accepts_good_settings() {
        let validated = settings().validate().unwrap();
        assert_eq!(validated.0, settings());
    }

    #[test]
    fn rejects_bad_settings() {
        let mut s = settings();
        s.coeffs.clear();
        assert!(s.validate().is_err());

        let mut s = settings();
        s.coeffs.push(Coeff { k: std::f64::INFINITY, chi: 0.0 });
        assert!(s.validate().is_err());

        let mut s = settings();
        s.coeffs[0].chi = std::f64::NAN;
        assert!(s.validate().is_err());

        let mut s = settings();
        s.threading.threads = Some(0);
        assert!(s.validate().is_err());
    }
}
