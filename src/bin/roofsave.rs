use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use roofsave::calc::{CalculationInput, SavingsCalculator, ValidationError};
use roofsave::materials::{compare_materials, rank_by_payback, MaterialCatalog, RoofType, TARGET_R_VALUE};
use roofsave::reference::ReferenceConfig;
use roofsave::report::{ReportFormat, SavingsReport};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roofsave")]
#[command(about = "Roof insulation savings calculator", long_about = None)]
struct Cli {
    /// Reference configuration file replacing the built-in Belgian tables
    #[arg(long, env = "ROOFSAVE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimates the savings of one insulation upgrade
    Calculate {
        /// Read the calculation input from a JSON file
        #[arg(
            short,
            long,
            conflicts_with_all = [
                "location",
                "roof_area",
                "current_r",
                "heating_source",
                "energy_price",
                "proposed_r",
                "upgrade_cost",
                "material",
            ]
        )]
        input: Option<PathBuf>,

        #[command(flatten)]
        project: ProjectArgs,

        /// Proposed R-value (m²·K/W)
        #[arg(long, required_unless_present_any = ["input", "material"], conflicts_with = "material")]
        proposed_r: Option<f64>,

        /// Total upgrade cost (€), estimated from the roof area when omitted
        #[arg(long, conflicts_with = "material")]
        upgrade_cost: Option<f64>,

        /// Price the upgrade with a catalog material (e.g. "glass_wool")
        #[arg(short, long)]
        material: Option<String>,

        #[arg(long, default_value = "flat")]
        roof_type: RoofType,

        /// Output format (markdown, html, csv, json)
        #[arg(short, long)]
        format: Option<ReportFormat>,

        /// Output file path; the format follows the extension unless --format is set
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },

    /// Lists regions and heating sources
    Regions {
        #[arg(short, long, value_enum, default_value_t = ListingFormat::Markdown)]
        format: ListingFormat,
    },

    /// Lists insulation materials, with quotes when a roof area is given
    Materials {
        #[arg(long)]
        roof_area: Option<f64>,

        #[arg(long, default_value = "flat")]
        roof_type: RoofType,
    },

    /// Compares every catalog material for one roof, ranked by payback
    Compare {
        #[command(flatten)]
        project: ProjectArgs,

        #[arg(long, default_value = "flat")]
        roof_type: RoofType,
    },
}

/// Output format of the reference listing.
#[derive(Clone, Copy, ValueEnum)]
enum ListingFormat {
    #[value(alias = "md")]
    Markdown,
    Json,
}

#[derive(Args)]
struct ProjectArgs {
    /// Region (e.g. "Vlaams")
    #[arg(short, long)]
    location: Option<String>,

    /// Roof area (m²)
    #[arg(long)]
    roof_area: Option<f64>,

    /// Current R-value (m²·K/W), 0 for an uninsulated roof
    #[arg(long)]
    current_r: Option<f64>,

    /// Heating source (gas, oil, electric, heat_pump)
    #[arg(long)]
    heating_source: Option<String>,

    /// Energy price (€/kWh), the region's average when omitted
    #[arg(long)]
    energy_price: Option<f64>,
}

impl ProjectArgs {
    fn to_input(&self, config: &ReferenceConfig, proposed_r: f64) -> anyhow::Result<CalculationInput> {
        let location = self.location.clone().context("--location is required")?;
        let energy_price =
            CalculationInput::price_or_region_default(self.energy_price, &location, config);
        Ok(CalculationInput {
            location,
            roof_area: self.roof_area.context("--roof-area is required")?,
            current_r_value: self.current_r.context("--current-r is required")?,
            proposed_r_value: proposed_r,
            heating_source: self.heating_source.clone().context("--heating-source is required")?,
            energy_price_per_kwh: energy_price,
            insulation_upgrade_cost: None,
        })
    }
}

fn exit_with_validation_error(err: &ValidationError) -> ! {
    eprintln!("error[{}]: {}", err.rule(), err);
    std::process::exit(2);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => ReferenceConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => ReferenceConfig::belgium(),
    };
    let calculator = SavingsCalculator::new(&config);
    let catalog = MaterialCatalog::belgian_market();

    match cli.command {
        Commands::Calculate {
            input,
            project,
            proposed_r,
            upgrade_cost,
            material,
            roof_type,
            format,
            output_file,
        } => {
            let mut quote = None;
            let request = match input {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("Failed to open input {:?}", path))?;
                    serde_json::from_reader(BufReader::new(file))
                        .with_context(|| format!("Failed to parse input {:?}", path))?
                }
                None => {
                    let base = project.to_input(&config, proposed_r.unwrap_or(TARGET_R_VALUE))?;
                    match &material {
                        Some(id) => {
                            let q = catalog.get(id)?.quote(base.roof_area, roof_type, TARGET_R_VALUE);
                            let request = base.with_material_quote(&q);
                            quote = Some(q);
                            request
                        }
                        None => match upgrade_cost {
                            Some(cost) => base.with_upgrade_cost(cost),
                            None => base,
                        },
                    }
                }
            };

            let result = match calculator.calculate(&request) {
                Ok(result) => result,
                Err(err) => exit_with_validation_error(&err),
            };

            let mut report = SavingsReport::new(&result);
            if let Some(q) = &quote {
                report = report.with_quote(q);
            }

            match (output_file, format) {
                (Some(path), None) => {
                    report.save_to_file(&path)?;
                    report.print_summary();
                    println!("Report saved to {:?}", path);
                }
                (Some(path), Some(format)) => {
                    std::fs::write(&path, report.render(format)?)?;
                    report.print_summary();
                    println!("Report saved to {:?}", path);
                }
                (None, format) => {
                    println!("{}", report.render(format.unwrap_or(ReportFormat::Markdown))?);
                }
            }
        }

        Commands::Regions { format } => {
            let catalog = config.catalog();
            match format {
                ListingFormat::Markdown => {
                    println!("| Region | Energy Price (€/kWh) | Heating Degree Days |");
                    println!("|--------|----------------------|---------------------|");
                    for region in &catalog.regions {
                        println!(
                            "| {} | {:.3} | {} |",
                            region.name, region.default_energy_price, region.heating_degree_days
                        );
                    }
                    println!();
                    println!("| Heating Source | Key | CO₂ (kg/kWh) |");
                    println!("|----------------|-----|--------------|");
                    for source in &catalog.heating_sources {
                        println!("| {} | {} | {:.3} |", source.label, source.value, source.co2_intensity);
                    }
                }
                ListingFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
            }
        }

        Commands::Materials { roof_area, roof_type } => {
            println!("| Material | Category | €/m² | λ (W/m·K) | Thickness (cm) | Surface (m²) | Cost (€) |");
            println!("|----------|----------|------|-----------|----------------|--------------|----------|");
            for material in catalog.materials() {
                let thickness_cm = material.thickness_for(TARGET_R_VALUE) * 100.0;
                let (surface, cost) = match roof_area {
                    Some(area) => {
                        let quote = material.quote(area, roof_type, TARGET_R_VALUE);
                        (format!("{:.1}", quote.surface_area), format!("{:.2}", quote.total_cost))
                    }
                    None => ("-".to_string(), "-".to_string()),
                };
                println!(
                    "| {} | {} | {:.2} | {:.3} | {:.1} | {} | {} |",
                    material.name,
                    material.category,
                    material.cost_per_m2,
                    material.conductivity,
                    thickness_cm,
                    surface,
                    cost
                );
            }
        }

        Commands::Compare { project, roof_type } => {
            let base = project.to_input(&config, TARGET_R_VALUE)?;
            info!("comparing {} materials for {}", catalog.len(), base.location);

            let mut comparisons = compare_materials(&calculator, &catalog, &base, roof_type);
            rank_by_payback(&mut comparisons);

            println!("| Rank | Material | Thickness (cm) | Cost (€) | Savings (€/year) | Payback | 10-Year Net (€) |");
            println!("|------|----------|----------------|----------|------------------|---------|-----------------|");
            for (rank, comparison) in comparisons.iter().enumerate() {
                let quote = &comparison.quote;
                match &comparison.outcome {
                    Ok(result) => println!(
                        "| {} | {} | {:.1} | {:.2} | {:.2} | {} | {:.2} |",
                        rank + 1,
                        quote.material_id,
                        quote.thickness_m * 100.0,
                        quote.total_cost,
                        result.annual_cost_savings,
                        SavingsReport::new(result).payback_string(),
                        result.ten_year_total_savings
                    ),
                    Err(err) => println!(
                        "| {} | {} | {:.1} | {:.2} | error[{}]: {} | - | - |",
                        rank + 1,
                        quote.material_id,
                        quote.thickness_m * 100.0,
                        quote.total_cost,
                        err.rule(),
                        err
                    ),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_input_file_conflicts_with_field_flags() {
        for flag in [
            "--roof-area",
            "--current-r",
            "--heating-source",
            "--energy-price",
            "--proposed-r",
            "--upgrade-cost",
        ] {
            let parsed =
                Cli::try_parse_from(["roofsave", "calculate", "--input", "in.json", flag, "1"]);
            assert!(parsed.is_err(), "--input accepted {flag}");
        }
        assert!(Cli::try_parse_from(["roofsave", "calculate", "--input", "in.json"]).is_ok());
    }

    #[test]
    fn test_material_conflicts_with_proposed_r() {
        let base = [
            "roofsave",
            "calculate",
            "--location",
            "Vlaams",
            "--roof-area",
            "100",
            "--current-r",
            "0",
            "--heating-source",
            "gas",
        ];

        let mut args = base.to_vec();
        args.extend(["--material", "glass_wool", "--proposed-r", "8"]);
        assert!(Cli::try_parse_from(args).is_err());

        let mut args = base.to_vec();
        args.extend(["--material", "glass_wool"]);
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[test]
    fn test_regions_format_is_typed() {
        let cli = Cli::try_parse_from(["roofsave", "regions", "--format", "md"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Regions {
                format: ListingFormat::Markdown
            }
        ));
        let cli = Cli::try_parse_from(["roofsave", "regions"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Regions {
                format: ListingFormat::Markdown
            }
        ));
        assert!(Cli::try_parse_from(["roofsave", "regions", "--format", "csv"]).is_err());
    }
}
