#[derive(clap::Parser)]
#[clap(version, about, author, subcommand_negates_reqs = true, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    #[clap(flatten)]
    pub set: set::Args,
}

#[derive(clap::Subcommand)]
pub enum Command {
    Properties(properties::Args),
}

pub mod set {
    use std::io::Write;

    use clap::builder::TypedValueParser;
    use tracing::info;

    use crate::device::{self, DeviceId, OutputReportWriter};
    use crate::packet;
    use crate::properties::{self, OutOfRange, Property};

    /// Set a monitor property.
    #[derive(clap::Parser, Clone, Debug)]
    #[group(id = "set::Args")]
    pub struct Args {
        /// Property to set.
        #[arg(long, short = 'p', required = true, value_parser = property_parser())]
        property: Option<&'static Property>,
        /// Monitor property value.
        ///
        /// Must be within the range of the property, see the `properties` command.
        #[arg(long, short = 'v', required = true, allow_negative_numbers = true, value_name = "0-255")]
        value: Option<i64>,
        /// Print the control packet instead of sending it to the monitor.
        #[arg(long)]
        dry_run: bool,
        #[clap(flatten)]
        device: device::Args,
    }

    fn property_parser() -> impl TypedValueParser<Value = &'static Property> {
        clap::builder::PossibleValuesParser::new(properties::names())
            .try_map(|name| properties::lookup(&name))
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        /// Only reachable when [`Args`] is built without going through [`crate::commands::Cli`],
        /// which already requires both flags.
        #[error("both `--property` and `--value` are required")]
        MissingArguments,
        #[error(transparent)]
        OutOfRange(#[from] OutOfRange),
        #[error("could not open the monitor")]
        Open(#[source] device::Error),
        #[error("could not send the control packet to the monitor")]
        Send(#[source] device::Error),
        #[error("could not write the control packet to the terminal")]
        WriteStdout(#[source] std::io::Error),
    }

    pub fn run(args: Args) -> Result<(), Error> {
        run_with(args, &mut std::io::stdout().lock(), device::open)
    }

    /// [`run`], but with `--dry-run` output going to `out` and the monitor opened by `open`.
    pub fn run_with(
        args: Args,
        out: &mut dyn Write,
        open: impl FnOnce(DeviceId) -> Result<Box<dyn OutputReportWriter>, device::Error>,
    ) -> Result<(), Error> {
        let (Some(property), Some(value)) = (args.property, args.value) else {
            return Err(Error::MissingArguments);
        };
        // The device must not be opened for a value that is going to be rejected anyway.
        property.validate(value)?;
        let packet = packet::encode(property, value)?;
        if args.dry_run {
            writeln!(out, "{packet}").map_err(Error::WriteStdout)?;
            return Ok(());
        }
        let mut monitor = open(args.device.device_id()).map_err(Error::Open)?;
        let written = monitor.write_report(&packet).map_err(Error::Send)?;
        info!(message = "property set", property = property.name, value, written);
        Ok(())
    }

}

pub mod properties {
    use crate::output;
    use crate::properties::{PROPERTIES, Property};

    /// List the properties that can be set.
    #[derive(clap::Parser, Clone, Debug)]
    pub struct Args {
        /// Only list properties whose name, description or code contains this text.
        filter: Option<String>,
        #[clap(flatten)]
        output: output::Args,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not output the property listing")]
        Output(#[source] output::Error),
    }

    #[derive(serde::Serialize)]
    pub struct PropertySchema {
        pub name: &'static str,
        pub code: u16,
        pub minimum: i64,
        pub maximum: i64,
        pub description: &'static str,
    }

    impl From<&'static Property> for PropertySchema {
        fn from(property: &'static Property) -> Self {
            Self {
                name: property.name,
                code: property.code,
                minimum: property.range.min(),
                maximum: property.range.max(),
                description: property.description,
            }
        }
    }

    const COLUMNS: &[&str] = &["Name", "Code", "Min", "Max", "Description"];

    pub fn run(args: Args) -> Result<(), Error> {
        let mut listing = args.output.open(COLUMNS).map_err(Error::Output)?;
        for property in PROPERTIES {
            if let Some(pattern) = &args.filter {
                if !property.is_match(pattern) {
                    continue;
                }
            }
            listing
                .row(
                    || {
                        vec![
                            property.name.to_string(),
                            format!("{:#06x}", property.code),
                            property.range.min().to_string(),
                            property.range.max().to_string(),
                            property.description.to_string(),
                        ]
                    },
                    || PropertySchema::from(property),
                )
                .map_err(Error::Output)?;
        }
        listing.finish().map_err(Error::Output)
    }
}
