//! Region Flux CLI - Command-line interface for Region Flux
//!
//! Commands:
//! - analyze: Segment readings and emit an analysis report
//! - locations: List filtered readings in the display timezone
//! - validate: Validate raw reading schema
//! - doctor: Diagnose configuration and alias tables
//! - schema: Print input or output schema

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use region_flux::schema::{RawReading, ReadingAdapter, SCHEMA_VERSION};
use region_flux::{
    AliasTable, AnalysisReport, AnalyzerConfig, ComputeError, LocationListing, ReadingQuery,
    RegionAnalyzer, FLUX_VERSION, PRODUCER_NAME,
};

/// Region Flux - Region-transition segmentation for location pings
#[derive(Parser)]
#[command(name = "regionflux")]
#[command(version = FLUX_VERSION)]
#[command(about = "Segment location pings into scored region dwell periods", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment readings and emit an analysis report
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Alias table file (`{"NY": ["NEW YORK", "USA"]}`)
        #[arg(long)]
        aliases: Option<PathBuf>,

        /// Analyzer config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Gap threshold in minutes (overrides the config file)
        #[arg(long)]
        gap_minutes: Option<i64>,

        /// Display timezone (UTC, America/New_York, +05:30, ...)
        #[arg(long, default_value = "UTC")]
        timezone: String,

        /// Keep readings on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// Keep readings on or before this date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,

        /// Keep readings whose location contains this text
        #[arg(long)]
        region: Option<String>,

        /// Keep readings with exactly this activity
        #[arg(long)]
        activity: Option<String>,
    },

    /// List filtered readings in the display timezone
    Locations {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Display timezone (UTC, America/New_York, +05:30, ...)
        #[arg(long, default_value = "UTC")]
        timezone: String,

        /// Keep readings on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// Keep readings on or before this date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,

        /// Keep readings whose location contains this text
        #[arg(long)]
        region: Option<String>,

        /// Keep readings with exactly this activity
        #[arg(long)]
        activity: Option<String>,
    },

    /// Validate raw reading schema
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and alias tables
    Doctor {
        /// Check alias table file
        #[arg(long)]
        aliases: Option<PathBuf>,

        /// Check analyzer config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one reading per line)
    Ndjson,
    /// JSON array of readings
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one segment or reading per line)
    Ndjson,
    /// Compact JSON document
    Json,
    /// Pretty-printed JSON document
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (geo.reading.v1)
    Input,
    /// Output schema (region.report.v1)
    Output,
}

/// Filters gathered from the command line
struct FilterArgs {
    start_date: Option<String>,
    end_date: Option<String>,
    region: Option<String>,
    activity: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), FluxCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            input_format,
            output_format,
            aliases,
            config,
            gap_minutes,
            timezone,
            start_date,
            end_date,
            region,
            activity,
        } => {
            let analyzer = build_analyzer(
                aliases.as_deref(),
                config.as_deref(),
                gap_minutes,
                &timezone,
                FilterArgs {
                    start_date,
                    end_date,
                    region,
                    activity,
                },
            )?;
            cmd_analyze(&analyzer, &input, &output, input_format, output_format)
        }

        Commands::Locations {
            input,
            output,
            input_format,
            output_format,
            timezone,
            start_date,
            end_date,
            region,
            activity,
        } => {
            let analyzer = build_analyzer(
                None,
                None,
                None,
                &timezone,
                FilterArgs {
                    start_date,
                    end_date,
                    region,
                    activity,
                },
            )?;
            cmd_locations(&analyzer, &input, &output, input_format, output_format)
        }

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor {
            aliases,
            config,
            json,
        } => cmd_doctor(aliases.as_deref(), config.as_deref(), json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn build_analyzer(
    aliases: Option<&Path>,
    config: Option<&Path>,
    gap_minutes: Option<i64>,
    timezone: &str,
    filters: FilterArgs,
) -> Result<RegionAnalyzer, FluxCliError> {
    let mut analyzer_config = match config {
        Some(path) => AnalyzerConfig::from_json(&fs::read_to_string(path)?)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(minutes) = gap_minutes {
        analyzer_config = AnalyzerConfig::with_gap_minutes(minutes);
    }

    let mut query = ReadingQuery::new();
    if let Some(date) = filters.start_date {
        query = query.start_date(&date)?;
    }
    if let Some(date) = filters.end_date {
        query = query.end_date(&date)?;
    }
    if let Some(region) = filters.region {
        query = query.region(&region);
    }
    if let Some(activity) = filters.activity {
        query = query.activity(&activity);
    }

    let mut analyzer = RegionAnalyzer::with_config(analyzer_config)?.with_query(query);

    if let Some(path) = aliases {
        analyzer.load_aliases(&fs::read_to_string(path)?)?;
    }
    analyzer.set_timezone(timezone)?;

    Ok(analyzer)
}

fn cmd_analyze(
    analyzer: &RegionAnalyzer,
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
) -> Result<(), FluxCliError> {
    let raw = read_readings(input, &input_format)?;
    let output_data = render_report(analyzer, &raw, &output_format)?;
    write_output(output, &output_data)
}

fn cmd_locations(
    analyzer: &RegionAnalyzer,
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
) -> Result<(), FluxCliError> {
    let raw = read_readings(input, &input_format)?;
    let readings = ReadingAdapter::to_readings(&raw)?;
    let listing = analyzer.locations(&readings);

    let output_data = format_listing(&listing, &output_format)?;
    write_output(output, &output_data)
}

/// Analyze raw readings; an empty input yields an empty report
fn render_report(
    analyzer: &RegionAnalyzer,
    raw: &[RawReading],
    format: &OutputFormat,
) -> Result<String, FluxCliError> {
    let readings = ReadingAdapter::to_readings(raw)?;
    let report = analyzer.analyze(&readings)?;
    format_output(&report, format)
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), FluxCliError> {
    let readings = read_readings(input, &input_format)?;

    let results = ReadingAdapter::validate_readings(&readings);

    let report = ValidationReport {
        total_readings: readings.len(),
        valid_readings: readings.len() - results.len(),
        invalid_readings: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                reading_id: r.reading_id.clone(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total readings:   {}", report.total_readings);
        println!("Valid readings:   {}", report.valid_readings);
        println!("Invalid readings: {}", report.invalid_readings);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Reading {} (index {}): {}",
                    err.reading_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_readings > 0 {
        Err(FluxCliError::ValidationFailed(report.invalid_readings))
    } else {
        Ok(())
    }
}

fn cmd_doctor(
    aliases: Option<&Path>,
    config: Option<&Path>,
    json: bool,
) -> Result<(), FluxCliError> {
    let mut checks: Vec<DoctorCheck> = vec![
        DoctorCheck {
            name: "flux_version".to_string(),
            status: CheckStatus::Ok,
            message: format!("Region Flux version {}", FLUX_VERSION),
        },
        DoctorCheck {
            name: "schema_version".to_string(),
            status: CheckStatus::Ok,
            message: format!("Input schema: {}", SCHEMA_VERSION),
        },
    ];

    if let Some(path) = aliases {
        checks.push(check_file("aliases", path, |content| {
            AliasTable::from_json(content)
                .map(|table| {
                    format!(
                        "Alias table valid ({} regions, {} aliases)",
                        table.len(),
                        table.alias_count()
                    )
                })
                .map_err(|e| format!("Invalid alias table: {}", e))
        }));
    }

    if let Some(path) = config {
        checks.push(check_file("config", path, |content| {
            AnalyzerConfig::from_json(content)
                .map(|cfg| format!("Config valid (gap threshold {}s)", cfg.gap_threshold_secs))
                .map_err(|e| e.to_string())
        }));
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (ready for --input -)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: FLUX_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Region Flux Doctor Report");
        println!("=========================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(FluxCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

/// Read a file and run a content check over it
fn check_file(
    name: &str,
    path: &Path,
    inspect: impl FnOnce(&str) -> Result<String, String>,
) -> DoctorCheck {
    if !path.exists() {
        return DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: format!("{} does not exist", path.display()),
        };
    }

    let (status, message) = match fs::read_to_string(path) {
        Ok(content) => match inspect(&content) {
            Ok(message) => (CheckStatus::Ok, message),
            Err(message) => (CheckStatus::Error, message),
        },
        Err(e) => (CheckStatus::Error, format!("Cannot read {}: {}", path.display(), e)),
    };

    DoctorCheck {
        name: name.to_string(),
        status,
        message,
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), FluxCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", SCHEMA_VERSION);
                println!();
                println!("One record per location ping:");
                println!();
                println!("- timestamp (or date): RFC 3339, or naive YYYY-MM-DD HH:MM:SS read as UTC");
                println!("- location: free-form label, e.g. \"Jersey City, NJ/USA\"");
                println!("- accuracy: accuracy radius in meters (non-negative)");
                println!("- latitude, longitude: WGS84 degrees, supplied together");
                println!("- activity: producer tag, e.g. \"Personal\"");
                println!("- accuracy_level (or accuracy.1): raw level used to derive signal_strength");
                println!("- signal_strength: 0-100, derived when absent");
                println!("- reading_id, schema_version: optional");
                println!();
                println!("Readings without a location are counted but never segmented.");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: region.report.v1");
                println!();
                println!("- producer: {{ name, version, instance_id }}");
                println!("- analysis: Array of segments containing:");
                println!("  - start_time, end_time (display timezone)");
                println!("  - region, readings_count, average_accuracy");
                println!("  - confidence (0-100)");
                println!("  - transition_type: region_change | time_gap | final_period");
                println!("- metadata: {{ total_readings, analyzed_readings, dropped_readings,");
                println!("    unique_regions, region_statistics, timezone, gap_threshold_secs,");
                println!("    date_range, computed_at_utc }}");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, FluxCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_readings(input: &Path, format: &InputFormat) -> Result<Vec<RawReading>, FluxCliError> {
    let input_data = read_input(input)?;
    let readings = match format {
        InputFormat::Ndjson => ReadingAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => ReadingAdapter::parse_array(&input_data)?,
    };
    Ok(readings)
}

fn write_output(output: &Path, data: &str) -> Result<(), FluxCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn format_output(report: &AnalysisReport, format: &OutputFormat) -> Result<String, FluxCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in &report.analysis {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn format_listing(listing: &LocationListing, format: &OutputFormat) -> Result<String, FluxCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in &listing.data {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(listing)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(listing)?),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "geo.reading.v1",
        "description": "Region Flux location ping schema",
        "type": "object",
        "required": ["timestamp"],
        "properties": {
            "schema_version": { "type": "string", "const": "geo.reading.v1" },
            "reading_id": { "type": "string" },
            "timestamp": { "type": "string" },
            "location": { "type": ["string", "null"] },
            "activity": { "type": ["string", "null"] },
            "accuracy": { "type": ["number", "null"], "minimum": 0 },
            "latitude": { "type": ["number", "null"], "minimum": -90, "maximum": 90 },
            "longitude": { "type": ["number", "null"], "minimum": -180, "maximum": 180 },
            "accuracy_level": { "type": ["number", "null"] },
            "signal_strength": { "type": ["number", "null"], "minimum": 0, "maximum": 100 }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "region.report.v1",
        "description": "Region Flux analysis report",
        "type": "object",
        "required": ["producer", "analysis", "metadata"],
        "properties": {
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "analysis": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "start_time": { "type": "string" },
                        "end_time": { "type": "string" },
                        "region": { "type": "string" },
                        "confidence": { "type": "number", "minimum": 0, "maximum": 100 },
                        "readings_count": { "type": "integer" },
                        "average_accuracy": { "type": "number" },
                        "transition_type": {
                            "type": "string",
                            "enum": ["region_change", "time_gap", "final_period"]
                        }
                    }
                }
            },
            "metadata": {
                "type": "object",
                "properties": {
                    "total_readings": { "type": "integer" },
                    "analyzed_readings": { "type": "integer" },
                    "dropped_readings": { "type": "integer" },
                    "unique_regions": { "type": "array", "items": { "type": "string" } },
                    "region_statistics": { "type": "object" },
                    "timezone": { "type": "string" },
                    "gap_threshold_secs": { "type": "integer" },
                    "date_range": { "type": ["object", "null"] },
                    "computed_at_utc": { "type": "string" }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum FluxCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for FluxCliError {
    fn from(e: io::Error) -> Self {
        FluxCliError::Io(e)
    }
}

impl From<ComputeError> for FluxCliError {
    fn from(e: ComputeError) -> Self {
        FluxCliError::Compute(e)
    }
}

impl From<serde_json::Error> for FluxCliError {
    fn from(e: serde_json::Error) -> Self {
        FluxCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<FluxCliError> for CliError {
    fn from(e: FluxCliError) -> Self {
        match e {
            FluxCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            FluxCliError::Compute(e) => compute_error(e),
            FluxCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            FluxCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} readings failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            FluxCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

fn compute_error(e: ComputeError) -> CliError {
    let (code, hint) = match &e {
        ComputeError::ParseError(_) | ComputeError::JsonError(_) => (
            "PARSE_ERROR",
            "Ensure input matches geo.reading.v1 and --input-format",
        ),
        ComputeError::InvalidTimezone(_) => (
            "INVALID_TIMEZONE",
            "Use UTC, an IANA name such as America/New_York, or an offset such as +05:30",
        ),
        ComputeError::DateParseError(_) => ("INVALID_DATE", "Use YYYY-MM-DD"),
        ComputeError::InvalidConfig(_) => (
            "INVALID_CONFIG",
            "Run 'regionflux doctor --config <file>' for details",
        ),
        ComputeError::InvalidReading(_) => (
            "VALIDATION_ERROR",
            "Run 'regionflux validate' for details",
        ),
    };

    CliError {
        code: code.to_string(),
        message: e.to_string(),
        hint: Some(hint.to_string()),
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_readings: usize,
    valid_readings: usize,
    invalid_readings: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    reading_id: Option<String>,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn analyzer(timezone: &str, region: Option<&str>) -> RegionAnalyzer {
        let filters = FilterArgs {
            start_date: None,
            end_date: None,
            region: region.map(str::to_string),
            activity: None,
        };
        build_analyzer(None, None, None, timezone, filters).unwrap()
    }

    #[test]
    fn test_empty_input_renders_empty_report() {
        let raw = ReadingAdapter::parse_ndjson("").unwrap();

        let json = render_report(&analyzer("UTC", None), &raw, &OutputFormat::Json).unwrap();

        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(payload["analysis"].as_array().unwrap().is_empty());
        assert_eq!(payload["metadata"]["total_readings"], 0);
        assert!(payload["metadata"]["date_range"].is_null());
    }

    #[test]
    fn test_locations_ndjson_output() {
        let raw = ReadingAdapter::parse_array(
            r#"[
                {"timestamp": "2024-11-23T15:05:00Z", "location": "New York - NY/USA"},
                {"timestamp": "2024-11-23T15:00:00Z", "location": "Jersey City, NJ/USA"}
            ]"#,
        )
        .unwrap();
        let readings = ReadingAdapter::to_readings(&raw).unwrap();
        let listing = analyzer("America/New_York", Some("ny")).locations(&readings);

        let output = format_listing(&listing, &OutputFormat::Ndjson).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);
        let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["timestamp"], "2024-11-23T10:05:00-05:00");
        assert_eq!(record["location"], "New York - NY/USA");
    }

    #[test]
    fn test_timezone_hint_mentions_named_zones() {
        let error = CliError::from(FluxCliError::Compute(ComputeError::InvalidTimezone(
            "Mars/Olympus".to_string(),
        )));

        assert_eq!(error.code, "INVALID_TIMEZONE");
        assert!(error.hint.unwrap().contains("America/New_York"));
    }
}
