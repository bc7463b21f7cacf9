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
use crate::env;
use crate::filetypes::{ForcesJson, SystemJson};
use crate::traits::{Load, Json};

use rsp2_potentials::improper::{self, Flags, Input, LogDiagnostics, MinimumImage};
use rsp2_potentials::improper::{NoImage, Params, StandardTally, Threading};
use rsp2_tasks_config::{self as config, ValidatedSettings, YamlRead};

use path_abs::FileRead;
use std::path::Path;

/// Size the thread team, falling back to `OMP_NUM_THREADS` and then to a single thread.
pub fn resolve_threading(settings: &config::Threading) -> FailResult<Threading>
{
    let nthreads = match settings.threads {
        Some(n) => n,
        None => env::omp_num_threads()?.unwrap_or(1),
    };
    ensure!(nthreads > 0, "the thread team must have at least one thread");
    Ok(Threading { nthreads, use_rayon: settings.rayon })
}

pub fn run_improper_files(
    settings_path: impl AsRef<Path>,
    system_path: impl AsRef<Path>,
) -> FailResult<ForcesJson>
{
    let settings = ValidatedSettings::from_reader(FileRead::open(settings_path.as_ref())?)?;
    let Json(system) = Json::<SystemJson>::load(system_path)?;
    run_improper(&settings, &system)
}

/// Compute the forces and requested tallies of every term in a system.
pub fn run_improper(settings: &config::Settings, system: &SystemJson) -> FailResult<ForcesJson>
{
    let params: Vec<_> = {
        settings.coeffs.iter()
            .map(|&config::Coeff { k, chi }| Params::from_degrees(k, chi))
            .collect()
    };
    let threading = resolve_threading(&settings.threading)?;

    let config::Compute { energy, virial, per_site_energy, per_site_virial } = settings.compute;
    let flags = Flags {
        energy, virial, per_site_energy, per_site_virial,
        newton_bond: settings.newton_bond,
    };

    let input = Input {
        positions: &system.positions,
        tags: system.tags(),
        nlocal: system.nlocal(),
        terms: &system.terms,
        image: &NoImage,
        timestep: system.timestep,
        flags,
    };
    match &system.cell {
        None => compute_forces(&params, &input, threading),
        Some(cell) => {
            let cell = cell.to_ortho_box();
            compute_forces(&params, &input.with_image(&cell), threading)
        },
    }
}

fn compute_forces<B: MinimumImage>(
    params: &[Params],
    input: &Input<'_, B>,
    threading: Threading,
) -> FailResult<ForcesJson>
{
    improper::check_input(params, input, &threading)?;
    debug!(
        "{} improper terms over {} sites ({} owned), {} types",
        input.terms.len(), input.num_sites(), input.nlocal, params.len(),
    );

    let compute = || improper::compute_totals(params, input, &StandardTally, &LogDiagnostics, threading);
    let totals = match threading.use_rayon {
        // one pool worker per member of the team
        true => {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threading.nthreads)
                .build()?
                .install(compute)
        },
        false => compute(),
    };

    if input.flags.energy {
        info!("improper energy: {}", totals.energy);
    }
    info!("max improper force: {:e}", totals.max_force(input.nlocal));
    Ok(totals.into())
}
