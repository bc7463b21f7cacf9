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

//! Thread-private accumulation of forces, energy and virial.
//!
//! Every worker owns one `ThreadContext` for the duration of a pass and is the only
//! one to write to it.  A site can be touched by terms belonging to several workers,
//! so nothing is shared until `reduce` sums the contexts after all workers are done.

use super::Flags;

use rsp2_array_types::V3;

/// Virial components, in the order `xx, yy, zz, xy, xz, yz`.
pub type Virial = [f64; 6];

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadContext {
    tid: usize,
    flags: Flags,
    force: Vec<V3>,
    energy: f64,
    virial: Virial,
    site_energy: Option<Vec<f64>>,
    site_virial: Option<Vec<Virial>>,
}

impl ThreadContext {
    /// Zeroed accumulators covering `nall` sites (owned and ghost).
    ///
    /// Per-site arrays are only allocated if `flags` asks for them.
    pub fn new(tid: usize, nall: usize, flags: &Flags) -> Self {
        ThreadContext {
            tid,
            flags: *flags,
            force: vec![V3::zero(); nall],
            energy: 0.0,
            virial: [0.0; 6],
            site_energy: match flags.per_site_energy {
                true => Some(vec![0.0; nall]),
                false => None,
            },
            site_virial: match flags.per_site_virial {
                true => Some(vec![[0.0; 6]; nall]),
                false => None,
            },
        }
    }

    pub fn tid(&self) -> usize { self.tid }
    pub fn flags(&self) -> &Flags { &self.flags }
    pub fn num_sites(&self) -> usize { self.force.len() }

    pub fn forces(&self) -> &[V3] { &self.force }
    pub fn energy(&self) -> f64 { self.energy }
    pub fn virial(&self) -> &Virial { &self.virial }
    pub fn site_energy(&self) -> Option<&[f64]> { self.site_energy.as_ref().map(|x| &x[..]) }
    pub fn site_virial(&self) -> Option<&[Virial]> { self.site_virial.as_ref().map(|x| &x[..]) }

    #[inline(always)]
    pub fn add_force(&mut self, site: usize, force: V3) { self.force[site] += force; }

    #[inline(always)]
    pub fn add_energy(&mut self, energy: f64) { self.energy += energy; }

    #[inline(always)]
    pub fn add_virial(&mut self, scale: f64, virial: &Virial) {
        for (dest, v) in self.virial.iter_mut().zip(virial) {
            *dest += scale * v;
        }
    }

    /// No-op if per-site energy was not requested.
    #[inline(always)]
    pub fn add_site_energy(&mut self, site: usize, energy: f64) {
        if let Some(site_energy) = &mut self.site_energy {
            site_energy[site] += energy;
        }
    }

    /// No-op if per-site virial was not requested.
    #[inline(always)]
    pub fn add_site_virial(&mut self, site: usize, scale: f64, virial: &Virial) {
        if let Some(site_virial) = &mut self.site_virial {
            for (dest, v) in site_virial[site].iter_mut().zip(virial) {
                *dest += scale * v;
            }
        }
    }
}

/// Add the forces of one term into a thread's buffer.
///
/// Without `NEWTON_BOND`, forces on ghost sites (`site >= nlocal`) are dropped;
/// the process that owns the ghost computes the same term and applies them there.
#[inline(always)]
pub fn apply_forces<const NEWTON_BOND: bool>(
    thr: &mut ThreadContext,
    sites: [usize; 4],
    forces: &[V3; 4],
    nlocal: usize,
) {
    for (&site, &force) in sites.iter().zip(forces) {
        if NEWTON_BOND || site < nlocal {
            thr.add_force(site, force);
        }
    }
}

//-------------------------------------------------------------------------------------

/// Everything that energy/virial bookkeeping receives about one term.
///
/// `f2` is omitted because it is determined by the others.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TallyTerm {
    pub sites: [usize; 4],
    pub nlocal: usize,
    pub newton_bond: bool,
    pub energy: f64,
    pub f1: V3,
    pub f3: V3,
    pub f4: V3,
    pub b1: V3,
    pub b2: V3,
    pub b3: V3,
}

/// Energy and virial bookkeeping, invoked once per term when a tally was requested.
pub trait Tally: Sync {
    fn ev_tally(&self, thr: &mut ThreadContext, term: &TallyTerm);
}

/// The usual four-body bookkeeping.
///
/// Without newton_bond, each owned site receives a quarter of the term's energy and virial;
/// with it, the full amount goes to the totals.
#[derive(Debug, Copy, Clone, Default)]
pub struct StandardTally;

impl Tally for StandardTally {
    fn ev_tally(&self, thr: &mut ThreadContext, term: &TallyTerm) {
        let TallyTerm { sites, nlocal, newton_bond, energy, f1, f3, f4, b1, b2, b3 } = *term;
        let flags = *thr.flags();

        let is_counted = |site: usize| newton_bond || site < nlocal;
        let num_owned = sites.iter().filter(|&&site| site < nlocal).count();

        if flags.energy {
            match newton_bond {
                true => thr.add_energy(energy),
                false => {
                    for _ in 0..num_owned {
                        thr.add_energy(0.25 * energy);
                    }
                },
            }
        }
        if flags.per_site_energy {
            for &site in &sites {
                if is_counted(site) {
                    thr.add_site_energy(site, 0.25 * energy);
                }
            }
        }

        if flags.virial || flags.per_site_virial {
            let v = term_virial(&[f1, f3, f4], &[b1, b2, b3]);
            if flags.virial {
                match newton_bond {
                    true => thr.add_virial(1.0, &v),
                    false => {
                        for _ in 0..num_owned {
                            thr.add_virial(0.25, &v);
                        }
                    },
                }
            }
            if flags.per_site_virial {
                for &site in &sites {
                    if is_counted(site) {
                        thr.add_site_virial(site, 0.25, &v);
                    }
                }
            }
        }
    }
}

/// Virial of a term, taking positions relative to the second site.
///
/// Relative to site 2, the other sites sit at `b1`, `b2` and `b2 + b3`,
/// and site 2 itself contributes nothing.
pub fn term_virial(&[f1, f3, f4]: &[V3; 3], &[b1, b2, b3]: &[V3; 3]) -> Virial {
    let b4 = b3 + b2;
    let outer = |i: usize, j: usize| b1[i] * f1[j] + b2[i] * f3[j] + b4[i] * f4[j];
    [
        outer(0, 0),
        outer(1, 1),
        outer(2, 2),
        outer(0, 1),
        outer(0, 2),
        outer(1, 2),
    ]
}

//-------------------------------------------------------------------------------------

/// Global totals summed from all threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub energy: f64,
    pub virial: Virial,
    pub forces: Vec<V3>,
    pub site_energy: Option<Vec<f64>>,
    pub site_virial: Option<Vec<Virial>>,
}

impl Totals {
    pub fn zero(nall: usize, flags: &Flags) -> Self {
        let ThreadContext {
            tid: _, flags: _, force, energy, virial, site_energy, site_virial,
        } = ThreadContext::new(0, nall, flags);
        Totals { energy, virial, forces: force, site_energy, site_virial }
    }

    fn absorb(&mut self, thr: &ThreadContext) {
        assert_eq!(self.forces.len(), thr.num_sites(), "threads disagree on the number of sites");

        self.energy += thr.energy;
        for (dest, v) in self.virial.iter_mut().zip(&thr.virial) {
            *dest += v;
        }
        for (dest, f) in self.forces.iter_mut().zip(&thr.force) {
            *dest += f;
        }
        if let (Some(dest), Some(src)) = (&mut self.site_energy, &thr.site_energy) {
            for (dest, e) in dest.iter_mut().zip(src) {
                *dest += e;
            }
        }
        if let (Some(dest), Some(src)) = (&mut self.site_virial, &thr.site_virial) {
            for (dest, v) in dest.iter_mut().zip(src) {
                for (dest, x) in dest.iter_mut().zip(v) {
                    *dest += x;
                }
            }
        }
    }

    /// Largest force norm among the owned sites.
    pub fn max_force(&self, nlocal: usize) -> f64 {
        self.forces[..nlocal].iter().map(|f| f.norm()).fold(0.0, f64::max)
    }
}

/// Sum the per-thread accumulators in order of thread id.
///
/// This must only run after every worker has finished.
pub fn reduce(nall: usize, flags: &Flags, threads: &[ThreadContext]) -> Totals {
    let mut totals = Totals::zero(nall, flags);
    for thr in threads {
        totals.absorb(thr);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_flags(newton_bond: bool) -> Flags {
        Flags {
            energy: true,
            virial: true,
            per_site_energy: true,
            per_site_virial: true,
            newton_bond,
        }
    }

    #[test]
    fn ownership_gating() {
        let flags = Flags::default();
        let forces = [
            V3([1.0, 0.0, 0.0]),
            V3([0.0, 1.0, 0.0]),
            V3([0.0, 0.0, 1.0]),
            V3([1.0, 1.0, 1.0]),
        ];
        // sites 2 and 3 are ghosts
        let sites = [0, 2, 1, 3];
        let nlocal = 2;

        let mut thr = ThreadContext::new(0, 4, &flags);
        apply_forces::<false>(&mut thr, sites, &forces, nlocal);
        assert_eq!(thr.forces()[0], forces[0]);
        assert_eq!(thr.forces()[1], forces[2]);
        assert_eq!(thr.forces()[2], V3::zero());
        assert_eq!(thr.forces()[3], V3::zero());

        let mut thr = ThreadContext::new(0, 4, &flags);
        apply_forces::<true>(&mut thr, sites, &forces, nlocal);
        assert_eq!(thr.forces()[2], forces[1]);
        assert_eq!(thr.forces()[3], forces[3]);
    }

    #[test]
    fn per_site_arrays_only_when_requested() {
        let thr = ThreadContext::new(3, 5, &Flags::default());
        assert_eq!(thr.tid(), 3);
        assert_eq!(thr.num_sites(), 5);
        assert!(thr.site_energy().is_none());
        assert!(thr.site_virial().is_none());

        let mut thr = ThreadContext::new(0, 5, &all_flags(true));
        thr.add_site_energy(4, 2.0);
        assert_eq!(thr.site_energy().unwrap()[4], 2.0);
        assert_eq!(thr.site_virial().unwrap().len(), 5);
    }

    fn sample_term(newton_bond: bool) -> TallyTerm {
        TallyTerm {
            sites: [0, 1, 2, 3],
            nlocal: 3,
            newton_bond,
            energy: 4.0,
            f1: V3([1.0, 2.0, 3.0]),
            f3: V3([-1.0, 0.5, 0.0]),
            f4: V3([0.0, -1.0, 2.0]),
            b1: V3([1.0, 0.0, 0.0]),
            b2: V3([0.0, 1.0, 0.0]),
            b3: V3([0.0, 0.0, 1.0]),
        }
    }

    #[test]
    fn tally_with_newton() {
        let term = sample_term(true);
        let mut thr = ThreadContext::new(0, 4, &all_flags(true));
        StandardTally.ev_tally(&mut thr, &term);

        let v = term_virial(&[term.f1, term.f3, term.f4], &[term.b1, term.b2, term.b3]);
        assert_eq!(thr.energy(), 4.0);
        assert_eq!(thr.virial(), &v);
        // every site gets a quarter, ghost included
        assert_eq!(thr.site_energy().unwrap(), &[1.0, 1.0, 1.0, 1.0][..]);
        assert_close!(thr.site_virial().unwrap()[3], [
            0.25 * v[0], 0.25 * v[1], 0.25 * v[2], 0.25 * v[3], 0.25 * v[4], 0.25 * v[5],
        ]);
    }

    #[test]
    fn tally_without_newton() {
        let term = sample_term(false);
        let mut thr = ThreadContext::new(0, 4, &all_flags(false));
        StandardTally.ev_tally(&mut thr, &term);

        let v = term_virial(&[term.f1, term.f3, term.f4], &[term.b1, term.b2, term.b3]);
        // three of four sites are owned
        assert_close!(thr.energy(), 3.0);
        assert_close!(abs=1e-14, thr.virial().to_vec(), v.iter().map(|x| 0.75 * x).collect::<Vec<_>>());
        assert_eq!(thr.site_energy().unwrap(), &[1.0, 1.0, 1.0, 0.0][..]);
        assert_eq!(thr.site_virial().unwrap()[3], [0.0; 6]);
    }

    #[test]
    fn virial_by_hand() {
        // positions relative to site 2: x1 = b1, x3 = b2, x4 = b2 + b3
        let f1 = V3([1.0, 2.0, 3.0]);
        let f3 = V3([-1.0, 0.5, 0.0]);
        let f4 = V3([0.0, -1.0, 2.0]);
        let x1 = V3([1.0, 0.0, 0.0]);
        let x3 = V3([0.0, 1.0, 0.0]);
        let x4 = V3([0.0, 1.0, 1.0]);

        let v = term_virial(&[f1, f3, f4], &[x1, x3, x4 - x3]);
        let expected = |i: usize, j: usize| x1[i] * f1[j] + x3[i] * f3[j] + x4[i] * f4[j];
        assert_close!(abs=1e-14, v, [
            expected(0, 0), expected(1, 1), expected(2, 2),
            expected(0, 1), expected(0, 2), expected(1, 2),
        ]);
    }

    #[test]
    fn reduction_sums_threads() {
        let flags = all_flags(true);
        let mut a = ThreadContext::new(0, 2, &flags);
        let mut b = ThreadContext::new(1, 2, &flags);
        a.add_force(0, V3([1.0, 0.0, 0.0]));
        b.add_force(0, V3([0.0, 1.0, 0.0]));
        b.add_force(1, V3([0.0, 0.0, 1.0]));
        a.add_energy(1.5);
        b.add_energy(2.5);
        a.add_virial(1.0, &[1.0; 6]);
        b.add_virial(2.0, &[1.0; 6]);
        a.add_site_energy(1, 0.5);
        b.add_site_virial(0, 1.0, &[2.0; 6]);

        let totals = reduce(2, &flags, &[a, b]);
        assert_eq!(totals.energy, 4.0);
        assert_eq!(totals.virial, [3.0; 6]);
        assert_eq!(totals.forces, vec![V3([1.0, 1.0, 0.0]), V3([0.0, 0.0, 1.0])]);
        assert_eq!(totals.site_energy, Some(vec![0.0, 0.5]));
        assert_eq!(totals.site_virial, Some(vec![[2.0; 6], [0.0; 6]]));
        assert_eq!(totals.max_force(2), f64::sqrt(2.0));
        assert_eq!(totals.max_force(1), f64::sqrt(2.0));

        let empty = reduce(3, &flags, &[]);
        assert_eq!(empty.forces, vec![V3::zero(); 3]);
    }
}
