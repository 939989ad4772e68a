use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, LevelFilter};

use geotile::utils::logger::Logger;
use geotile::commands::{CommandFactory, GeotileCommandFactory};

fn main() {
    let matches = ClapCommand::new("geotile")
        .version("0.1.0")
        .about("Sample geo-referenced raster tiles")
        .arg(
            Arg::new("input")
                .help("Input raster file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug output on stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Engine configuration file (TOML)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("backup-bbox")
                .long("backup-bbox")
                .help("Extent to use when the raster has no georeference (minlon,minlat,maxlon,maxlat)")
                .value_name("BBOX")
                .required(false),
        )
        .arg(
            Arg::new("sample")
                .short('s')
                .long("sample")
                .help("Render one tile")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tiles")
                .short('t')
                .long("tiles")
                .help("Render a grid of tiles covering the raster")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("bbox")
                .long("bbox")
                .help("Region to render (minlon,minlat,maxlon,maxlat)")
                .value_name("BBOX")
                .required(false),
        )
        .arg(
            Arg::new("size")
                .long("size")
                .help("Tile size in pixels")
                .value_name("WxH")
                .required(false),
        )
        .arg(
            Arg::new("brighten")
                .long("brighten")
                .help("Brightening factor applied after stretching")
                .value_name("FACTOR")
                .required(false),
        )
        .arg(
            Arg::new("grid")
                .long("grid")
                .help("Number of tile columns and rows")
                .value_name("CxR")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output image file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for rendered tiles")
                .value_name("DIR")
                .required(false),
        )
        .get_matches();

    let logger = match Logger::new("geotile.log") {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if matches.get_flag("verbose") {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else if let Err(e) = Logger::init_global_logger("geotile-global.log") {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = GeotileCommandFactory::new();

    match factory.create_command(&matches, &logger) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
