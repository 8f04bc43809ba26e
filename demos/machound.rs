#[macro_use]
extern crate log;

use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use structopt::StructOpt;
use walkdir::WalkDir;

use machound::*;

#[derive(Debug, StructOpt)]
#[structopt(name = "machound", about = "Inspect Mach-O files and audit their hardening")]
struct Opt {
    /// Only report the slices of the given architecture, e.g. `arm64` or `x86_64`
    #[structopt(long)]
    arch: Option<String>,

    /// Fail a slice on its first anomaly
    #[structopt(long)]
    strict: bool,

    /// The most load commands a slice may declare
    #[structopt(long, default_value = "4096")]
    max_load_commands: usize,

    /// The most dylibs listed per slice
    #[structopt(long, default_value = "256")]
    max_dylibs: usize,

    /// Only print the security report
    #[structopt(short, long)]
    security: bool,

    /// Files or directories to inspect
    #[structopt(parse(from_os_str), required = true)]
    paths: Vec<PathBuf>,
}

impl Opt {
    fn options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_strict(self.strict)
            .with_max_load_commands(self.max_load_commands)
            .with_max_dylibs(self.max_dylibs)
    }

    fn files(&self) -> Vec<PathBuf> {
        self.paths
            .iter()
            .flat_map(|path| {
                WalkDir::new(path)
                    .follow_links(false)
                    .into_iter()
                    .filter_map(move |entry| match entry {
                        Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
                        Ok(_) => None,
                        Err(err) => {
                            warn!("skip {:?}, {}", path, err);

                            None
                        }
                    })
            })
            .collect()
    }
}

fn report(path: &Path, result: &ParseResult, arch: Option<(cpu_type_t, cpu_subtype_t)>, security: bool) -> bool {
    let mut ok = true;

    for (i, outcome) in result.slices().iter().enumerate() {
        if let Some((cputype, cpusubtype)) = arch {
            let matched = outcome
                .arch()
                .map(|fat| (fat.cputype, fat.cpusubtype))
                .or_else(|| outcome.slice().map(|slice| (slice.cputype(), slice.cpusubtype())))
                .map_or(false, |(t, s)| {
                    t == cputype && get_cpu_subtype_type(s) == get_cpu_subtype_type(cpusubtype)
                });

            if !matched {
                continue;
            }
        }

        match outcome.result() {
            Ok(slice) if security => print!("{}: {}\n{}", path.display(), slice.arch_name(), slice.security()),
            Ok(_) if result.is_fat() => print!("{} (architecture {}):\n{}", path.display(), i, outcome),
            Ok(_) => print!("{}:\n{}", path.display(), outcome),
            Err(err) => {
                eprintln!("{} ({}): {}", path.display(), outcome.arch_name(), err);

                ok = false;
            }
        }
    }

    ok
}

fn run(opt: &Opt) -> Result<bool> {
    let arch = match opt.arch {
        Some(ref name) => Some(get_arch_from_name(name).ok_or_else(|| anyhow!("unknown architecture {}", name))?),
        None => None,
    };
    let opts = opt.options();
    let files = opt.files();

    debug!("parsing {} files with {:?}", files.len(), opts);

    let results = files
        .par_iter()
        .map(|path| parse_file_with(path, &opts).with_context(|| format!("fail to parse {}", path.display())))
        .collect::<Vec<_>>();

    let mut ok = true;

    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(result) => ok &= report(path, &result, arch, opt.security),
            Err(err) => {
                eprintln!("{:#}", err);

                ok = false;
            }
        }
    }

    Ok(ok)
}

fn main() {
    let _ = pretty_env_logger::try_init();

    let opt = Opt::from_args();

    match run(&opt) {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(err) => {
            eprintln!("{:#}", err);

            exit(1);
        }
    }
}
