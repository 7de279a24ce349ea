#![allow(clippy::cast_possible_truncation)]

mod options;
mod output;
mod request;

use anyhow::{Context, Error as AnyError};
use clap::Parser;
use coverage::CameraModel;
use options::{Cli, Command as CliCmd, Format};
use rayon::prelude::*;
use request::{Plan, Request};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> Result<(), AnyError> {
    let Cli { camera, cmd } = Cli::parse();

    env_logger::init();

    let camera = camera
        .map(|path| {
            CameraModel::from_path(&path)
                .with_context(|| format!("loading camera {}", path.display()))
        })
        .transpose()?;

    match cmd {
        CliCmd::Plan { request, format } => {
            let plan = Request::from_path(&request)?.plan(camera.as_ref())?;
            match format {
                Format::Csv => output::print_csv(&plan.waypoints)?,
                Format::Json => output::print_json(&plan)?,
                Format::Plot => output::plot_ascii(&plan.waypoints),
            };
        }
        CliCmd::Batch { requests } => {
            let plans = requests
                .par_iter()
                .map(|path| {
                    Request::from_path(path)?
                        .plan(camera.as_ref())
                        .with_context(|| format!("{}", path.display()))
                })
                .collect::<Result<Vec<Plan>, AnyError>>()?;
            for plan in &plans {
                output::print_json(plan)?;
            }
        }
    }
    Ok(())
}
