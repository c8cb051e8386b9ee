use crate::infra::load_store;
use chrono::{DateTime, Utc};
use clap::Args;
use std::io::{self, Write};
use trial_insights::dashboard::{
    Category, DashboardService, Item, MoveOutcome, NarrativeSummary, Profile, ProfileId,
    RadarChartView,
};
use trial_insights::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct ProfilesArgs {
    /// Only print this profile
    #[arg(long)]
    pub(crate) profile: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Profile to run the walkthrough on (defaults to the configured profile)
    #[arg(long)]
    pub(crate) profile: Option<String>,
}

pub(crate) fn run_profiles(args: ProfilesArgs) -> Result<(), AppError> {
    let store = load_store(args.profile.as_deref())?;

    let selected: Vec<&Profile> = match &args.profile {
        Some(_) => vec![store.current_profile()],
        None => store.profiles().iter().collect(),
    };

    for profile in selected {
        render_profile(profile)?;
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = load_store(args.profile.as_deref())?;
    let profile_id = store.current_profile().id.clone();
    let service = DashboardService::ready(store);

    let stdout = io::stdout();
    walkthrough(&service, &profile_id, &mut stdout.lock())?;
    Ok(())
}

/// Moves two items, resets the profile, then prints its summary.
fn walkthrough(
    service: &DashboardService,
    profile_id: &ProfileId,
    out: &mut impl Write,
) -> io::Result<()> {
    let Some(profile) = service.profile(profile_id) else {
        return Ok(());
    };
    writeln!(out, "Trial insights demo: {} ({})", profile.name, profile.id)?;
    let mut previous = profile.radar();
    render_radar(out, "Initial scores", &previous)?;

    let mut script: Vec<(Item, Option<Category>)> = Vec::new();
    if let Some(waiting) = profile.trial_data.available.first() {
        script.push((waiting.clone(), Some(Category::Motivation)));
    }
    if let Some(engaged) = profile
        .trial_data
        .items(Some(Category::HealthcareEngagement))
        .first()
    {
        script.push((engaged.clone(), Some(Category::LogisticsChallenge)));
    }

    for (item, target) in script {
        let receipt = service.move_item(profile_id, &item, target);
        let destination = target.map(Category::label).unwrap_or("available insights");
        match receipt.outcome {
            MoveOutcome::Applied { from, .. } => writeln!(
                out,
                "\nMoved '{}' from {} to {} at {}",
                item.name,
                from.map(Category::label).unwrap_or("available insights"),
                destination,
                format_timestamp(receipt.last_data_change_timestamp)
            )?,
            MoveOutcome::Ignored { reason } => {
                writeln!(out, "\nMove of '{}' ignored: {:?}", item.name, reason)?
            }
        }
        if let Some(radar) = receipt.radar {
            render_deltas(out, &previous, &radar)?;
            previous = radar;
        }
    }

    if let Some(restored) = service.reset_profile(profile_id) {
        writeln!(
            out,
            "\nProfile reset at {}",
            format_timestamp(service.current_profile().last_data_change_timestamp)
        )?;
        render_radar(out, "Scores after reset", &restored.radar())?;
    }

    if let Some(summary) = service.summary(profile_id) {
        render_summary(out, &summary)?;
    }

    Ok(())
}

fn render_profile(profile: &Profile) -> io::Result<()> {
    let stdout = io::stdout();
    let out = &mut stdout.lock();
    writeln!(out, "\n{} ({})", profile.name, profile.id)?;
    let demographic = &profile.demographic;
    writeln!(
        out,
        "- age {} | {} | compliance {:.0}% | BMI inputs {:.0} kg / {:.0} cm",
        demographic.age,
        demographic.gender,
        demographic.compliance,
        demographic.weight,
        demographic.height
    )?;
    render_radar(out, "Category scores", &profile.radar())?;

    for category in Category::ALL {
        let items = profile.trial_data.items(Some(category));
        if items.is_empty() {
            continue;
        }
        writeln!(out, "  {}: {}", category, item_names(items))?;
    }
    if !profile.trial_data.available.is_empty() {
        writeln!(
            out,
            "  Available: {}",
            item_names(&profile.trial_data.available)
        )?;
    }
    Ok(())
}

fn render_radar(out: &mut impl Write, title: &str, radar: &RadarChartView) -> io::Result<()> {
    writeln!(out, "{title}:")?;
    for axis in &radar.axes {
        writeln!(
            out,
            "  - {:<22} {:>4.1}/10 ({} multiplier)",
            axis.category.label(),
            axis.score,
            axis.level.label()
        )?;
    }
    Ok(())
}

fn render_deltas(
    out: &mut impl Write,
    before: &RadarChartView,
    after: &RadarChartView,
) -> io::Result<()> {
    for (old, new) in before.axes.iter().zip(&after.axes) {
        let delta = new.score - old.score;
        if delta.abs() < f64::EPSILON {
            continue;
        }
        writeln!(
            out,
            "  - {:<22} {:>4.1} -> {:>4.1} ({:+.1})",
            new.category.label(),
            old.score,
            new.score,
            delta
        )?;
    }
    Ok(())
}

fn render_summary(out: &mut impl Write, summary: &NarrativeSummary) -> io::Result<()> {
    writeln!(out, "\n{}", summary.headline)?;
    for observation in &summary.observations {
        writeln!(out, "  * {observation}")?;
    }
    writeln!(out, "Recommendations:")?;
    for recommendation in &summary.recommendations {
        writeln!(out, "  - {recommendation}")?;
    }
    Ok(())
}

fn item_names(items: &[Item]) -> String {
    items
        .iter()
        .map(|item| format!("{} ({:.0})", item.name, item.score))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|moment| moment.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}
