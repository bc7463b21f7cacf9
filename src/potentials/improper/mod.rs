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

//! Harmonic improper dihedrals, evaluated on a team of worker threads.
//!
//! ```text
//!   E = k (omega - chi)^2
//! ```
//!
//! where `omega` is the angle between the plane through sites 1, 2, 3 and the
//! plane through sites 2, 3, 4.
//!
//! The term list is split into one contiguous range per thread.  Each thread
//! accumulates into its own [`ThreadContext`], and the contexts are summed by
//! [`reduce`] once every thread has finished.  Whether energy is computed,
//! whether energy and virial are tallied, and whether forces on ghost sites are
//! kept are all decided once per pass, by selecting one of eight
//! monomorphized copies of the inner loop.

use crate::FailResult;

use rsp2_array_types::V3;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

pub mod accum;
pub mod angle;
pub mod diagnostics;
pub mod force;
pub mod geometry;
pub mod image;
pub mod partition;
mod eval;

pub use self::accum::{reduce, StandardTally, Tally, TallyTerm, ThreadContext, Totals, Virial};
pub use self::angle::AngleTerms;
pub use self::diagnostics::{Diagnostics, ImproperProblem, LogDiagnostics};
pub use self::eval::{compute, compute_totals};
pub use self::geometry::BondGeometry;
pub use self::image::{MinimumImage, NoImage, OrthoBox};

/// Coefficients of one improper type.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Params {
    /// Force constant, in energy per squared radian.
    pub k: f64,
    /// Equilibrium angle, in radians.
    pub chi: f64,
}

impl Params {
    /// Coefficients as they are usually written in input files, with `chi` in degrees.
    pub fn from_degrees(k: f64, chi_degrees: f64) -> Self {
        Params { k, chi: chi_degrees.to_radians() }
    }
}

/// Four sites and the index of their coefficients.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Term {
    pub sites: [usize; 4],
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_id: usize,
}

/// What to compute during one pass.  Fixed for the duration of the pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Flags {
    /// Accumulate the total energy.
    pub energy: bool,
    /// Accumulate the total virial.
    pub virial: bool,
    pub per_site_energy: bool,
    pub per_site_virial: bool,
    /// Keep forces (and tallies) on ghost sites, instead of leaving them to whoever
    /// owns those sites.
    pub newton_bond: bool,
}

impl Flags {
    pub fn wants_energy(&self) -> bool {
        self.energy || self.per_site_energy
    }

    pub fn wants_tally(&self) -> bool {
        self.energy || self.virial || self.per_site_energy || self.per_site_virial
    }
}

/// Everything the kernel reads.  None of it is modified.
#[derive(Debug)]
pub struct Input<'a, B = NoImage> {
    /// Coordinates of all sites, owned sites first.  The length of this is `nall`.
    pub positions: &'a [V3],
    /// Global identifiers of the sites, used only for diagnostics.
    pub tags: Option<&'a [usize]>,
    /// Sites below this index are owned; the rest are ghosts.
    pub nlocal: usize,
    pub terms: &'a [Term],
    pub image: &'a B,
    /// Used only for diagnostics.
    pub timestep: u64,
    pub flags: Flags,
}

// (manual impls because derive would require B: Clone)
impl<'a, B> Clone for Input<'a, B> {
    fn clone(&self) -> Self { *self }
}
impl<'a, B> Copy for Input<'a, B> {}

impl<'a> Input<'a, NoImage> {
    /// An input with no boundary correction, no ghosts and no tags.
    pub fn new(positions: &'a [V3], terms: &'a [Term], flags: Flags) -> Self {
        Input {
            positions,
            tags: None,
            nlocal: positions.len(),
            terms,
            image: &NoImage,
            timestep: 0,
            flags,
        }
    }
}

impl<'a, B> Input<'a, B> {
    pub fn with_image<C>(self, image: &'a C) -> Input<'a, C> {
        let Input { positions, tags, nlocal, terms, image: _, timestep, flags } = self;
        Input { positions, tags, nlocal, terms, image, timestep, flags }
    }

    pub fn num_sites(&self) -> usize { self.positions.len() }

    /// The identifier reported for a site in diagnostics.
    pub fn tag(&self, site: usize) -> usize {
        match self.tags {
            Some(tags) => tags[site],
            None => site,
        }
    }
}

/// How the term list is divided up.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Threading {
    pub nthreads: usize,
    /// Run the threads on rayon's pool.  Otherwise, they are run one after another
    /// on the calling thread (which produces identical results).
    pub use_rayon: bool,
}

impl Threading {
    pub fn serial() -> Self { Threading { nthreads: 1, use_rayon: false } }
}

impl Default for Threading {
    fn default() -> Self { Threading::serial() }
}

/// Validate everything that `compute` assumes about its input.
pub fn check_input<B>(params: &[Params], input: &Input<'_, B>, threading: &Threading) -> FailResult<()> {
    let nall = input.num_sites();

    ensure!(threading.nthreads > 0, "at least one thread is required");
    ensure!(
        input.nlocal <= nall,
        "nlocal ({}) exceeds the number of sites ({})", input.nlocal, nall,
    );
    if let Some(tags) = input.tags {
        ensure!(
            tags.len() == nall,
            "got {} tags for {} sites", tags.len(), nall,
        );
    }
    for (i, term) in input.terms.iter().enumerate() {
        if let Some(&site) = term.sites.iter().find(|&&site| site >= nall) {
            bail!("term {} refers to site {}, but there are only {} sites", i, site, nall);
        }
        ensure!(
            term.type_id < params.len(),
            "term {} has type {}, but only {} types have coefficients", i, term.type_id, params.len(),
        );
    }
    for (type_id, p) in params.iter().enumerate() {
        ensure!(
            p.k.is_finite() && p.chi.is_finite(),
            "non-finite coefficients for type {}: {:?}", type_id, p,
        );
    }
    Ok(())
}
