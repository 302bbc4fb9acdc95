use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

mod catalog;
mod chat;
mod config;
mod engine;
mod import;
mod models;
mod report;
mod server;

use catalog::{Catalog, RoleOrder};
use chat::{ChatRequest, ChatResponder};
use config::ChatSettings;
use engine::{Jitter, NoJitter, UniformJitter};
use models::{PredictionResult, RoleCategory};

#[derive(Parser)]
#[command(name = "career-guidance")]
#[command(about = "Placement prediction, course guidance and career chat for students", long_about = None)]
struct Cli {
    /// Role and course catalog to use instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Catalog,
    Demand,
    Growth,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Development,
    Data,
    Infrastructure,
    Quality,
}

impl From<CategoryArg> for RoleCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Development => RoleCategory::Development,
            CategoryArg::Data => RoleCategory::Data,
            CategoryArg::Infrastructure => RoleCategory::Infrastructure,
            CategoryArg::Quality => RoleCategory::Quality,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "CAREER_BIND", default_value = "127.0.0.1:8080")]
        bind: String,
    },
    /// Predict placement for one profile (JSON)
    #[command(group(
        ArgGroup::new("noise")
            .args(["seed", "no_jitter"])
            .multiple(false)
    ))]
    Predict {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        no_jitter: bool,
    },
    /// Score every profile in a CSV file
    Batch {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Write a markdown summary here as well
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown report for one profile
    Report {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List career roles
    Roles {
        #[arg(long, value_enum, default_value_t = SortArg::Catalog)]
        sort: SortArg,
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        /// Profile (JSON) to score against each role's required skills
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// List courses for a recommendation label or course group
    Courses {
        recommendation: String,
    },
    /// Ask the career chat one question
    Ask {
        #[arg(long)]
        message: String,
    },
}

fn jitter_for(seed: Option<u64>) -> Box<dyn Jitter> {
    match seed {
        Some(seed) => Box::new(UniformJitter::new(StdRng::seed_from_u64(seed))),
        None => Box::new(UniformJitter::thread()),
    }
}

fn print_prediction(result: &PredictionResult) {
    println!(
        "Placement probability: {:.1}% ({})",
        result.placement_probability * 100.0,
        if result.placement_prediction == 1 {
            "likely"
        } else {
            "at risk"
        }
    );
    println!("Expected salary: {:.2} LPA", result.expected_salary);

    if result.recommendations.is_empty() {
        println!("No recommendations.");
    } else {
        println!("Recommendations:");
        for recommendation in &result.recommendations {
            println!("- {recommendation}");
        }
    }

    if result.skill_gaps.is_empty() {
        println!("No skill gaps.");
    } else {
        println!("Skill gaps:");
        for gap in &result.skill_gaps {
            println!("- {gap}");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };

    match cli.command {
        Commands::Serve { bind } => {
            let settings = ChatSettings::from_env()?;
            if settings.api_key.is_none() {
                tracing::warn!(
                    "{} is not set; chat requests will fail until it is",
                    config::API_KEY_VAR
                );
            }
            let state = server::AppState {
                catalog: Arc::new(catalog),
                responder: ChatResponder::from_settings(&settings),
            };
            server::run(state, &bind).await?;
        }
        Commands::Predict {
            profile,
            seed,
            no_jitter,
        } => {
            let profile = import::load_profile_json(&profile)?;
            let result = if no_jitter {
                engine::predict(&profile, &mut NoJitter)
            } else {
                engine::predict(&profile, &mut jitter_for(seed))
            };
            print_prediction(&result);
        }
        Commands::Batch {
            csv,
            limit,
            seed,
            out,
        } => {
            let students = import::import_csv(&csv)?;
            if students.is_empty() {
                println!("No profiles found in {}.", csv.display());
                return Ok(());
            }

            let scored = report::score_students(&students, &mut jitter_for(seed));
            println!("Top students by placement probability:");
            for student in scored.iter().take(limit) {
                println!("{}", report::score_line(student));
            }

            if let Some(out) = out {
                std::fs::write(&out, report::build_batch_report(&scored, limit))
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Summary written to {}.", out.display());
            }
        }
        Commands::Report { profile, out, seed } => {
            let profile = import::load_profile_json(&profile)?;
            let result = engine::predict(&profile, &mut jitter_for(seed));
            std::fs::write(&out, report::build_report(&result, &catalog))
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Roles {
            sort,
            category,
            profile,
        } => {
            let order = match sort {
                SortArg::Catalog => RoleOrder::Catalog,
                SortArg::Demand => RoleOrder::Demand,
                SortArg::Growth => RoleOrder::Growth,
            };
            let profile = profile
                .as_deref()
                .map(import::load_profile_json)
                .transpose()?;

            for role in catalog.list_roles(order, category.map(RoleCategory::from)) {
                println!(
                    "- {} ({}) demand {}/10, growth {}/10, {}-{} per year",
                    role.title,
                    role.id,
                    role.job_market_demand,
                    role.growth_potential,
                    role.salary_range.min,
                    role.salary_range.max
                );
                if let Some(profile) = &profile {
                    for skill in engine::role_fit(profile, role).skills {
                        println!(
                            "    {} ({:?}, {:?}): your level {}%",
                            skill.skill, skill.importance, skill.level, skill.proficiency
                        );
                    }
                }
            }
        }
        Commands::Courses { recommendation } => {
            let courses = catalog.courses_for_recommendation(&recommendation);
            if courses.is_empty() {
                println!("No courses found for {recommendation}.");
            }
            for course in courses {
                println!("- {} by {} ({:?}): {}", course.name, course.provider, course.level, course.url);
            }
        }
        Commands::Ask { message } => {
            let settings = ChatSettings::from_env()?;
            let responder = ChatResponder::from_settings(&settings);
            let request = ChatRequest {
                message,
                conversation_history: Vec::new(),
            };
            match responder.respond(&request).await {
                Ok(reply) => {
                    println!("{}", reply.response);
                    println!("(model: {})", reply.model);
                }
                Err(err) => {
                    tracing::error!(error = %err, "chat failed");
                    println!("{}", err.user_message());
                }
            }
        }
    }

    Ok(())
}
