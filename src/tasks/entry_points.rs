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
use crate::cmd::run_improper_files;
use crate::traits::{Json, Save};
use crate::ui::logging::GlobalLogger;

use clap::{App, Arg, ArgMatches};
use std::ffi::OsStr;

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> FailResult<()>,
{
    main().unwrap_or_else(|e| {
        for cause in e.iter_chain() {
            error!("{}", cause);
        }

        if std::env::var_os("RUST_BACKTRACE") == Some(OsStr::new("1").to_owned()) {
            error!("{}", e.backtrace());
        } else {
            error!("\
                (If you found the above error message to be particularly lacking in \
                detail, try again with RUST_BACKTRACE=1)\
            ");
        }
        std::process::exit(1);
    });
}

fn required_value<'a>(matches: &'a ArgMatches<'_>, name: &str) -> FailResult<&'a str> {
    matches.value_of(name).ok_or_else(|| format_err!("missing required argument: {}", name))
}

// %% CRATES: binary: rsp2-improper %%
pub fn improper() {
    wrap_result_main(|| {
        let matches = {
            App::new("rsp2-improper")
                .version(clap::crate_version!())
                .about("Forces and energy of harmonic improper dihedrals.")
                .args(&[
                    Arg::with_name("config")
                        .short("c").long("config")
                        .value_name("SETTINGS")
                        .takes_value(true)
                        .required(true)
                        .help("settings yaml"),
                    Arg::with_name("input")
                        .value_name("SYSTEM")
                        .required(true)
                        .help("system json, with positions and terms"),
                    Arg::with_name("output")
                        .short("o").long("output")
                        .value_name("FORCES")
                        .takes_value(true)
                        .help("write forces json here instead of to stdout"),
                    Arg::with_name("log")
                        .long("log")
                        .value_name("LOGFILE")
                        .takes_value(true)
                        .help("also write the log to this file"),
                    Arg::with_name("verbose")
                        .short("v").long("verbose")
                        .multiple(true)
                        .help("log more (may be given twice)"),
                ])
                .get_matches()
        };

        let mut logger = GlobalLogger::default();
        logger.verbosity(matches.occurrences_of("verbose") as i32);
        if let Some(path) = matches.value_of("log") {
            logger.path(path);
        }
        logger.apply()?;

        let forces = run_improper_files(
            required_value(&matches, "config")?,
            required_value(&matches, "input")?,
        )?;

        match matches.value_of("output") {
            Some(path) => Json(&forces).save(path)?,
            None => {
                serde_json::to_writer_pretty(std::io::stdout(), &forces)?;
                println!();
            },
        }
        Ok(())
    });
}
