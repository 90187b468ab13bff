//! Edu-Mentor CLI
//!
//! Command-line front end for the counselling portal:
//! - Sign in, register, sign out
//! - Browse and filter colleges and courses
//! - Apply to a course, book a counselling session, send an enquiry
//! - Student and admin dashboards

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use edumentor::booking::{AppointmentBooking, AppointmentForm, BookingOutcome, PURPOSES, TIME_SLOTS};
use edumentor::contact::{EnquiryForm, EnquiryOutcome, ENQUIRY_SUCCESS_MESSAGE, SUBJECTS};
use edumentor::dashboard::{AdminDashboard, StudentDashboard};
use edumentor::display::{short_id, StarRating, StatusBadge};
use edumentor::finder::{CollegeFilter, CollegeFinder};
use edumentor::gateway::{College, Course};
use edumentor::wizard::{ApplicationWizard, SubmitOutcome, REQUIRED_DOCUMENTS};
use edumentor::{
    testimonials, Config, Gateway, LoginForm, PortalApi, RegisterForm, SessionState,
    SessionStore, ViewScope,
};

#[derive(Parser)]
#[command(name = "edumentor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Edu-Mentor counselling portal client")]
#[command(long_about = "Browse colleges, apply to courses and book counselling sessions with Edu-Mentor Services.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Portal backend URL, overrides the config file
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create a student account and sign in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Re-read the profile from the backend
        #[arg(long)]
        refresh: bool,
    },

    /// List colleges
    Colleges {
        /// State (substring, case-insensitive)
        #[arg(short, long, default_value = "")]
        state: String,
        /// Course type offered, e.g. B.Tech
        #[arg(short = 't', long, default_value = "")]
        course_type: String,
        /// Name or location (substring, case-insensitive)
        #[arg(short = 'q', long, default_value = "")]
        search: String,
    },

    /// List courses
    Courses {
        /// Only courses offered by this college id
        #[arg(long)]
        college: Option<String>,
    },

    /// Apply to a course
    Apply {
        #[arg(long)]
        college: String,
        #[arg(long)]
        course: String,
        /// Document file name (repeatable)
        #[arg(short, long = "doc")]
        docs: Vec<String>,
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Book a counselling session
    Book {
        /// Date, YYYY-MM-DD
        #[arg(short, long)]
        date: NaiveDate,
        /// Slot start, HH:MM
        #[arg(short, long)]
        time: String,
        #[arg(short, long)]
        purpose: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Send an enquiry
    Enquire {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },

    /// Featured student testimonials
    Testimonials,

    /// Your applications and appointments
    Dashboard,

    /// Admin overview
    Admin,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.backend_url {
        config.gateway.base_url = url.clone();
    }

    edumentor::logging::init(&config.logging)?;
    tracing::debug!(backend = %config.gateway.base_url, "Starting edumentor");

    let gateway = Gateway::new(&config.gateway)?;
    let mut session = SessionState::restore(SessionStore::new(config.session.path()));
    let format = cli.format;

    match cli.command {
        Commands::Login { email, password } => {
            let form = LoginForm { email, password };
            let user = session
                .login(&gateway, &form)
                .await
                .map_err(|e| anyhow::anyhow!(e.message()))?;
            println!("Signed in as {} ({})", user.display_name(), user.role.as_str());
        }

        Commands::Register {
            email,
            password,
            first_name,
            last_name,
            phone,
        } => {
            let form = RegisterForm {
                email,
                phone,
                password,
                first_name,
                last_name,
            };
            let user = session
                .register(&gateway, &form)
                .await
                .map_err(|e| anyhow::anyhow!(e.message()))?;
            println!("Welcome, {}! Your account is ready.", user.first_name);
        }

        Commands::Logout => {
            session.logout();
            println!("Signed out");
        }

        Commands::Whoami { refresh } => {
            if refresh {
                session
                    .refresh_profile(&gateway)
                    .await
                    .map_err(|e| anyhow::anyhow!(e.message()))?;
            }

            match session.user() {
                Some(user) if format == Format::Json => print_json(user)?,
                Some(user) => {
                    println!("Name:  {}", user.display_name());
                    println!("Email: {}", user.email);
                    if let Some(phone) = &user.phone {
                        println!("Phone: {}", phone);
                    }
                    println!("Role:  {}", user.role.as_str());
                }
                None => println!("Not signed in"),
            }
        }

        Commands::Colleges {
            state,
            course_type,
            search,
        } => {
            let scope = ViewScope::new();
            let Some(mut finder) = CollegeFinder::load(&gateway, &scope).await else {
                return Ok(());
            };
            if let Some(message) = finder.load_error() {
                bail!("{}", message);
            }

            finder.set_filter(CollegeFilter {
                state,
                course_type,
                search,
            });

            if format == Format::Json {
                print_json(&finder.filtered())?;
            } else {
                print_colleges(&finder.filtered());
                println!();
                println!("{}", finder.summary());
            }
        }

        Commands::Courses { college } => {
            let mut courses = gateway.list_courses().await?;

            if let Some(college_id) = college {
                let colleges = gateway.list_colleges().await?;
                let Some(college) = colleges.iter().find(|c| c.id == college_id) else {
                    bail!("Unknown college {}", college_id);
                };
                courses.retain(|c| college.offers(&c.course_type));
            }

            if format == Format::Json {
                print_json(&courses)?;
            } else {
                print_courses(&courses);
            }
        }

        Commands::Apply {
            college,
            course,
            docs,
            notes,
        } => {
            let current = session.require()?;
            let scope = ViewScope::new();
            let Some(mut wizard) = ApplicationWizard::load(&gateway, &scope).await else {
                return Ok(());
            };
            if let Some(message) = wizard.load_error() {
                bail!("{}", message);
            }

            wizard.select_college(&college)?;
            wizard.select_course(&course)?;
            wizard.next_step()?;

            if docs.is_empty() {
                println!("No documents attached. Usually required:");
                for doc in REQUIRED_DOCUMENTS {
                    println!("  - {}", doc);
                }
            }
            wizard.add_documents(docs)?;
            wizard.set_notes(notes)?;
            wizard.next_step()?;

            let review = wizard.review();
            if let (Some(college), Some(course)) = (review.college, review.course) {
                println!("Applying to {} at {}", course.name, college.name);
            }

            match wizard.submit(&gateway, current).await? {
                SubmitOutcome::Submitted(application) => {
                    if format == Format::Json {
                        print_json(&application)?;
                    } else {
                        println!("{}", wizard.message().unwrap_or_default());
                        if let Some(application) = application {
                            println!("Application #{}", short_id(&application.id));
                        }
                    }
                }
                SubmitOutcome::Failed(message) => bail!("{}", message),
            }
        }

        Commands::Book {
            date,
            time,
            purpose,
            notes,
        } => {
            let current = session.require()?;
            let mut booking = AppointmentBooking::new();
            booking.form = AppointmentForm {
                date: Some(date),
                time,
                purpose,
                notes,
            };

            let today = Local::now().date_naive();
            let outcome = booking
                .submit(&gateway, current, today)
                .await
                .with_context(|| {
                    format!(
                        "Slots: {}\nPurposes: {}",
                        TIME_SLOTS.join(", "),
                        PURPOSES.join(", ")
                    )
                })?;

            match outcome {
                BookingOutcome::Booked(appointment) => {
                    if format == Format::Json {
                        print_json(&appointment)?;
                    } else {
                        println!("{}", booking.message().unwrap_or_default());
                    }
                }
                BookingOutcome::Failed(message) => bail!("{}", message),
            }
        }

        Commands::Enquire {
            name,
            email,
            phone,
            subject,
            message,
        } => {
            let mut form = EnquiryForm {
                name,
                email,
                phone,
                subject,
                message,
            };

            let outcome = form
                .submit(&gateway)
                .await
                .with_context(|| format!("Subjects: {}", SUBJECTS.join(", ")))?;

            match outcome {
                EnquiryOutcome::Sent(_) => println!("{}", ENQUIRY_SUCCESS_MESSAGE),
                EnquiryOutcome::Failed(message) => bail!("{}", message),
            }
        }

        Commands::Testimonials => {
            let list = testimonials::featured_or_default(&gateway).await;

            if format == Format::Json {
                print_json(&list)?;
            } else {
                for t in &list {
                    println!("{}  {}", StarRating::new(t.rating).render(), t.student_name);
                    println!("  {} - {}", t.course, t.college);
                    println!("  \"{}\"", t.message);
                    println!();
                }
            }
        }

        Commands::Dashboard => {
            let current = session.require()?;
            let scope = ViewScope::new();
            let mut dashboard = StudentDashboard::new(current.user().clone());
            dashboard.load(&gateway, current, &scope).await;

            if format == Format::Json {
                print_json(&serde_json::json!({
                    "applications": dashboard.applications().value(),
                    "appointments": dashboard.appointments().value(),
                }))?;
                return Ok(());
            }

            let overview = dashboard.overview();
            println!("Welcome back, {}!", dashboard.user().first_name);
            println!();
            println!("Applications:           {}", overview.total_applications);
            println!("Approved:               {}", overview.approved_applications);
            println!("Scheduled appointments: {}", overview.scheduled_appointments);

            println!();
            println!("Recent applications");
            if let Some(error) = dashboard.applications().error() {
                println!("  ({})", error);
            } else if overview.recent_applications.is_empty() {
                println!("  No applications yet");
            }
            for app in overview.recent_applications {
                println!(
                    "  #{:<8} {:<14} {}",
                    short_id(&app.id),
                    app.status.label(),
                    app.applied_date.map(|d| d.to_string()).unwrap_or_default()
                );
            }

            println!();
            println!("Upcoming appointments");
            if let Some(error) = dashboard.appointments().error() {
                println!("  ({})", error);
            } else if overview.upcoming_appointments.is_empty() {
                println!("  No upcoming appointments");
            }
            for apt in &overview.upcoming_appointments {
                println!(
                    "  {} {}  {}",
                    apt.appointment_date, apt.appointment_time, apt.purpose
                );
            }
        }

        Commands::Admin => {
            let current = session.require()?;
            if !current.user().is_admin() {
                tracing::warn!(role = current.user().role.as_str(), "Admin view requested by non-admin");
            }

            let scope = ViewScope::new();
            let mut dashboard = AdminDashboard::new();
            dashboard.load(&gateway, current, &scope).await;

            if format == Format::Json {
                print_json(&serde_json::json!({
                    "stats": dashboard.stats().value(),
                    "applications": dashboard.applications().value(),
                    "enquiries": dashboard.enquiries().value(),
                }))?;
                return Ok(());
            }

            let overview = dashboard.overview();
            if let Some(error) = dashboard.stats().error() {
                println!("Stats unavailable: {}", error);
            }
            println!("Students:          {}", overview.stats.total_students);
            println!("Applications:      {}", overview.stats.total_applications);
            println!("Colleges:          {}", overview.stats.total_colleges);
            println!("Pending enquiries: {}", overview.stats.pending_enquiries);

            println!();
            println!("Recent applications");
            for app in overview.recent_applications {
                println!(
                    "  #{:<8} student {:<8} {}",
                    short_id(&app.id),
                    short_id(&app.student_id),
                    app.status.label()
                );
            }

            println!();
            println!("Recent enquiries");
            for enquiry in overview.recent_enquiries {
                let state = if enquiry.is_resolved { "RESOLVED" } else { "OPEN" };
                println!("  {:<9} {:<24} {}", state, enquiry.name, enquiry.subject);
            }
        }

        Commands::Config { output } => {
            let config = edumentor::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_colleges(colleges: &[&College]) {
    if colleges.is_empty() {
        println!("No colleges found matching your criteria.");
        return;
    }

    println!(
        "{:<26} {:<34} {:<22} {:<8} {}",
        "ID", "Name", "Location", "Rating", "Courses"
    );
    println!("{}", "-".repeat(116));

    for college in colleges {
        println!(
            "{:<26} {:<34} {:<22} {:<8} {}",
            college.id,
            college.name,
            format!("{}, {}", college.location, college.state),
            format!("{:.1}", college.rating),
            college.courses.join(", ")
        );
    }
}

fn print_courses(courses: &[Course]) {
    if courses.is_empty() {
        println!("No courses found.");
        return;
    }

    println!("{:<26} {:<32} {:<10} {}", "ID", "Name", "Type", "Duration");
    println!("{}", "-".repeat(86));

    for course in courses {
        println!(
            "{:<26} {:<32} {:<10} {}",
            course.id,
            course.name,
            course.course_type,
            course.duration
        );
    }
}
