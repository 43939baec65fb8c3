use beamrec::{
    console::{run_buffered, Args},
    error::BrResult,
};
use clap::Parser;
use env_logger::Env;
use std::io;

fn main() -> BrResult<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    //parse CLI arguments
    let args = Args::parse();
    run_buffered(&args, io::stdout().lock())
}
