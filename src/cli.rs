use argparse::{ArgumentParser, Store, StoreOption};
use wod2gpx::errors::AppError;
use wod2gpx::gpx_writer::{GpxOptions, DEFAULT_CREATOR, DEFAULT_SYMBOL};
use wod2gpx::wod_parser::{Boundary, DEFAULT_SENTINEL, DEFAULT_SEPARATOR};

pub struct CliArgs {
    pub infile: Option<String>,
    pub outfile: Option<String>,
    pub comment: Option<String>,
    pub symbol: String,
    pub boundary: String,
    pub separator: String,
    pub sentinel: String,
    pub creator: String,
    pub log_level: String,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            infile: None,
            outfile: None,
            comment: None,
            symbol: DEFAULT_SYMBOL.into(),
            boundary: "sentinel".into(),
            separator: DEFAULT_SEPARATOR.into(),
            sentinel: DEFAULT_SENTINEL.into(),
            creator: DEFAULT_CREATOR.into(),
            log_level: "essential".into(),
        }
    }
}

impl CliArgs {
    pub fn boundary(&self) -> Result<Boundary, AppError> {
        match self.boundary.as_str() {
            "separator" => Boundary::separator(&self.separator),
            "sentinel" => Ok(Boundary::sentinel(self.sentinel.clone())),
            other => Err(AppError::Parse(format!("unknown boundary mode '{}' (separator|sentinel)", other))),
        }
    }

    pub fn gpx_options(&self) -> GpxOptions {
        GpxOptions {
            comment: self.comment.clone(),
            symbol: self.symbol.clone(),
            creator: self.creator.clone(),
        }
    }
}

/// `None` and `-` both mean the standard stream.
pub fn as_path(arg: &Option<String>) -> Option<&str> {
    arg.as_deref().filter(|p| *p != "-")
}

pub fn parse_cli() -> CliArgs {
    let mut args = CliArgs::default();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Convert WOD metadata to GPX format.");
        ap.refer(&mut args.infile)
            .add_argument("infile", StoreOption, "File to process. Use '-' for stdin.");
        ap.refer(&mut args.outfile)
            .add_argument("outfile", StoreOption, "File to write GPX data to. Use '-' for stdout.");
        ap.refer(&mut args.comment)
            .add_option(&["--comment"], StoreOption, "Comment to be added to the GPX 'desc' field");
        ap.refer(&mut args.symbol)
            .add_option(&["--symbol"], Store, "Symbol to use. Default is a small red x");
        ap.refer(&mut args.boundary)
            .add_option(&["--boundary"], Store, "Record boundary: sentinel|separator");
        ap.refer(&mut args.separator)
            .add_option(&["--separator"], Store, "Regex for separator lines (with --boundary separator)");
        ap.refer(&mut args.sentinel)
            .add_option(&["--sentinel"], Store, "Key that starts a new record (with --boundary sentinel)");
        ap.refer(&mut args.creator)
            .add_option(&["--creator"], Store, "GPX creator attribute");
        ap.refer(&mut args.log_level)
            .add_option(&["--log"], Store, "Log level (essential|debug|trace|warn|error)");
        ap.parse_args_or_exit();
    }
    args
}
