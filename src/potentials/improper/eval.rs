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

use super::{accum, angle, force, partition};
use super::{BondGeometry, Diagnostics, ImproperProblem, Input, MinimumImage, Params};
use super::{Tally, TallyTerm, Term, ThreadContext, Threading, Totals};

use rsp2_array_types::V3;

use rayon_cond::CondIterator;
use std::ops::Range;

/// Evaluate every term, returning the accumulators of each thread in order of thread id.
///
/// Each term is evaluated exactly once, by the thread whose range contains it.
/// `diagnostics` hears about each term whose geometry is ill-conditioned; such terms
/// are still evaluated.  `tally` is only consulted if the flags ask for energy or virial.
///
/// The input must have passed [`check_input`](super::check_input).
pub fn compute<B, T, D>(
    params: &[Params],
    input: &Input<'_, B>,
    tally: &T,
    diagnostics: &D,
    threading: Threading,
) -> Vec<ThreadContext>
where
    B: MinimumImage,
    T: Tally,
    D: ?Sized + Diagnostics,
{
    let Threading { nthreads, use_rayon } = threading;
    let flags = input.flags;
    let nall = input.num_sites();
    let nterms = input.terms.len();

    let evflag = flags.wants_tally();
    let eflag = flags.wants_energy();
    let newton_bond = flags.newton_bond;
    trace!(
        "improper: {} terms on {} threads (evflag={}, eflag={}, newton_bond={}, rayon={})",
        nterms, nthreads, evflag, eflag, newton_bond, use_rayon,
    );

    let kernel = Kernel { params, input, tally, diagnostics };
    CondIterator::new(0..nthreads, use_rayon).map(|tid| {
        let range = partition::thread_range(nterms, nthreads, tid);
        let mut thr = ThreadContext::new(tid, nall, &flags);

        match (evflag, eflag, newton_bond) {
            (true, true, true) => kernel.eval::<true, true, true>(range, &mut thr),
            (true, true, false) => kernel.eval::<true, true, false>(range, &mut thr),
            (true, false, true) => kernel.eval::<true, false, true>(range, &mut thr),
            (true, false, false) => kernel.eval::<true, false, false>(range, &mut thr),
            (false, true, true) => kernel.eval::<false, true, true>(range, &mut thr),
            (false, true, false) => kernel.eval::<false, true, false>(range, &mut thr),
            (false, false, true) => kernel.eval::<false, false, true>(range, &mut thr),
            (false, false, false) => kernel.eval::<false, false, false>(range, &mut thr),
        }
        thr
    }).collect()
}

/// `compute`, followed by `reduce`.
pub fn compute_totals<B, T, D>(
    params: &[Params],
    input: &Input<'_, B>,
    tally: &T,
    diagnostics: &D,
    threading: Threading,
) -> Totals
where
    B: MinimumImage,
    T: Tally,
    D: ?Sized + Diagnostics,
{
    let threads = compute(params, input, tally, diagnostics, threading);
    accum::reduce(input.num_sites(), &input.flags, &threads)
}

pub(super) struct Kernel<'a, 'b, B, T, D: ?Sized> {
    pub(super) params: &'a [Params],
    pub(super) input: &'a Input<'b, B>,
    pub(super) tally: &'a T,
    pub(super) diagnostics: &'a D,
}

impl<'a, 'b, B, T, D> Kernel<'a, 'b, B, T, D>
where
    B: MinimumImage,
    T: Tally,
    D: ?Sized + Diagnostics,
{
    fn eval<const EVFLAG: bool, const EFLAG: bool, const NEWTON_BOND: bool>(
        &self,
        range: Range<usize>,
        thr: &mut ThreadContext,
    ) {
        for term in &self.input.terms[range] {
            let geom = BondGeometry::compute(self.input.positions, term.sites, self.input.image);
            self.eval_term::<EVFLAG, EFLAG, NEWTON_BOND>(term, &geom, thr);
        }
    }

    #[inline(always)]
    pub(super) fn eval_term<const EVFLAG: bool, const EFLAG: bool, const NEWTON_BOND: bool>(
        &self,
        term: &Term,
        geom: &BondGeometry,
        thr: &mut ThreadContext,
    ) {
        let solution = angle::solve(geom);
        if solution.is_out_of_domain() {
            self.report_problem(term, solution.raw_cosine, thr.tid());
        }

        let params = &self.params[term.type_id];
        let force::TermForces { energy, forces } = force::compute::<EFLAG>(params, geom, &solution.terms);

        let nlocal = self.input.nlocal;
        accum::apply_forces::<NEWTON_BOND>(thr, term.sites, &forces, nlocal);

        if EVFLAG {
            let [f1, _, f3, f4] = forces;
            self.tally.ev_tally(thr, &TallyTerm {
                sites: term.sites,
                nlocal,
                newton_bond: NEWTON_BOND,
                energy,
                f1, f3, f4,
                b1: geom.b1,
                b2: geom.b2,
                b3: geom.b3,
            });
        }
    }

    #[cold]
    fn report_problem(&self, term: &Term, cosine: f64, thread: usize) {
        let input = self.input;
        let [i1, i2, i3, i4] = term.sites;
        let positions: [V3; 4] = [
            input.positions[i1],
            input.positions[i2],
            input.positions[i3],
            input.positions[i4],
        ];
        self.diagnostics.improper_problem(&ImproperProblem {
            thread,
            timestep: input.timestep,
            tags: [input.tag(i1), input.tag(i2), input.tag(i3), input.tag(i4)],
            positions,
            cosine,
        });
    }
}
