//! Subcommands and their handlers. Each handler drives the state containers
//! the same way the mobile screens do, then prints the resulting state.

use std::sync::Arc;

use anyhow::{Context as _, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use moments_core::{
  moment::{Moment, MomentId, MomentPatch, NewMoment, Renew},
  stats::Statistics,
  store::{MomentStore, PreferenceStore},
  tags::{decode_tags, encode_tags},
};
use moments_state::{MomentsContainer, MomentsState, SettingsContainer};

// ─── Arguments ────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
  /// List every moment, most recent first.
  List,
  /// Show one moment in full.
  Show { id: MomentId },
  /// Record a new moment.
  Add(AddArgs),
  /// Change some fields of an existing moment.
  Edit(EditArgs),
  /// Delete a moment. Unknown ids are ignored.
  Delete { id: MomentId },
  /// Print totals, rating averages and favourite locations.
  Stats,
}

#[derive(Args, Debug)]
pub struct AddArgs {
  #[arg(long)]
  companion: String,

  /// Defaults to "Moment with <companion>".
  #[arg(long)]
  title: Option<String>,

  #[arg(long, default_value = "Other")]
  location: String,

  #[arg(long, default_value = "")]
  context: String,

  /// RFC 3339 timestamp or YYYY-MM-DD; defaults to now.
  #[arg(long, value_parser = parse_date)]
  date: Option<DateTime<Utc>>,

  #[arg(long)]
  pleasure: u8,

  #[arg(long)]
  comfort: u8,

  #[arg(long)]
  audacity: u8,

  /// Something that went well (repeatable).
  #[arg(long = "top", value_name = "TAG")]
  top_tags: Vec<String>,

  /// Something that fell flat (repeatable).
  #[arg(long = "flop", value_name = "TAG")]
  flop_tags: Vec<String>,

  #[arg(long)]
  notes: Option<String>,

  /// Would you do it again: yes or no.
  #[arg(long)]
  renew: Option<Renew>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
  id: MomentId,

  #[arg(long)]
  title: Option<String>,

  #[arg(long)]
  location: Option<String>,

  #[arg(long)]
  context: Option<String>,

  #[arg(long, value_parser = parse_date)]
  date: Option<DateTime<Utc>>,

  #[arg(long)]
  companion: Option<String>,

  #[arg(long)]
  pleasure: Option<u8>,

  #[arg(long)]
  comfort: Option<u8>,

  #[arg(long)]
  audacity: Option<u8>,

  /// Replaces the whole top-tag list (repeatable).
  #[arg(long = "top", value_name = "TAG")]
  top_tags: Vec<String>,

  /// Replaces the whole flop-tag list (repeatable).
  #[arg(long = "flop", value_name = "TAG")]
  flop_tags: Vec<String>,

  #[arg(long, conflicts_with = "clear_notes")]
  notes: Option<String>,

  #[arg(long)]
  clear_notes: bool,

  #[arg(long, conflicts_with = "clear_renew")]
  renew: Option<Renew>,

  #[arg(long)]
  clear_renew: bool,
}

fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
    .map_err(|_| format!("expected RFC 3339 or YYYY-MM-DD, got {s:?}"))
}

impl AddArgs {
  fn into_new_moment(self) -> Result<NewMoment> {
    let title = self
      .title
      .filter(|t| !t.trim().is_empty())
      .unwrap_or_else(|| format!("Moment with {}", self.companion.trim()));

    Ok(NewMoment {
      title,
      location: self.location,
      context: self.context,
      date: self.date.unwrap_or_else(Utc::now),
      companion: self.companion.trim().to_owned(),
      pleasure_rating: self.pleasure,
      comfort_rating: self.comfort,
      audacity_rating: self.audacity,
      top_tags: encode_tags(&self.top_tags)?,
      flop_tags: encode_tags(&self.flop_tags)?,
      personal_notes: self.notes.filter(|n| !n.trim().is_empty()),
      to_renew: self.renew,
    })
  }
}

impl EditArgs {
  fn into_patch(self) -> Result<(MomentId, MomentPatch)> {
    let tags = |tags: Vec<String>| -> Result<Option<String>> {
      if tags.is_empty() { Ok(None) } else { Ok(Some(encode_tags(&tags)?)) }
    };

    let patch = MomentPatch {
      title:           self.title,
      location:        self.location,
      context:         self.context,
      date:            self.date,
      companion:       self.companion,
      pleasure_rating: self.pleasure,
      comfort_rating:  self.comfort,
      audacity_rating: self.audacity,
      top_tags:        tags(self.top_tags)?,
      flop_tags:       tags(self.flop_tags)?,
      personal_notes:  if self.clear_notes { Some(None) } else { self.notes.map(Some) },
      to_renew:        if self.clear_renew { Some(None) } else { self.renew.map(Some) },
    };
    Ok((self.id, patch))
  }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// Run a journal command against an initialised store.
pub async fn journal<S: MomentStore>(command: JournalCommand, store: Arc<S>) -> Result<()> {
  let moments = MomentsContainer::new(store.clone());

  match command {
    JournalCommand::List => {
      moments.load().await;
      let state = settled(moments.state())?;
      if state.moments.is_empty() {
        println!("No moments recorded yet.");
      }
      for m in &state.moments {
        println!("{}", summary_line(m));
      }
    }
    JournalCommand::Show { id } => {
      moments.load().await;
      settled(moments.state())?;
      let m = moments
        .find_by_id(id)
        .ok_or_else(|| anyhow!("no moment with id {id}"))?;
      print_detail(&m);
    }
    JournalCommand::Add(args) => {
      let input = args.into_new_moment()?;
      let created = moments.create(input).await;
      settled(moments.state())?;
      let id = created.context("store returned no id")?;
      println!("Created moment #{id}");
    }
    JournalCommand::Edit(args) => {
      let (id, patch) = args.into_patch()?;
      if patch.is_empty() {
        println!("Nothing to change.");
        return Ok(());
      }
      moments.update(id, patch).await;
      settled(moments.state())?;
      println!("Updated moment #{id}");
    }
    JournalCommand::Delete { id } => {
      moments.delete(id).await;
      settled(moments.state())?;
      println!("Deleted moment #{id}");
    }
    JournalCommand::Stats => {
      let stats = store
        .statistics()
        .await
        .context("failed to compute statistics")?;
      print_stats(&stats);
    }
  }

  Ok(())
}

/// Print the theme preference, toggling it first if asked.
pub async fn theme<P: PreferenceStore>(prefs: Arc<P>, toggle: bool) -> Result<()> {
  let settings = SettingsContainer::new(prefs);
  settings.load().await;
  if toggle {
    settings.toggle().await;
  }

  let state = settings.state();
  println!("Dark mode: {}", if state.is_dark_mode { "on" } else { "off" });
  if state.unsaved {
    bail!("theme changed for this session but could not be saved");
  }
  Ok(())
}

/// Turn a container error into a command failure.
fn settled(state: MomentsState) -> Result<MomentsState> {
  match state.error {
    Some(err) => bail!(err),
    None => Ok(state),
  }
}

// ─── Output ───────────────────────────────────────────────────────────────────

fn summary_line(m: &Moment) -> String {
  format!(
    "#{:<4} {}  {} @ {} with {}  [P{} C{} A{}]",
    m.id,
    m.date.format("%Y-%m-%d"),
    m.title,
    m.location,
    m.companion,
    m.pleasure_rating,
    m.comfort_rating,
    m.audacity_rating,
  )
}

fn tag_list(raw: &str) -> String {
  match decode_tags(raw) {
    Ok(tags) if tags.is_empty() => "-".to_owned(),
    Ok(tags) => tags.join(", "),
    // Older rows may hold text that isn't a JSON array; show it as stored.
    Err(_) => raw.to_owned(),
  }
}

fn print_detail(m: &Moment) {
  println!("#{} {}", m.id, m.title);
  println!("  date:      {}", m.date.format("%Y-%m-%d %H:%M"));
  println!("  location:  {}", m.location);
  println!("  companion: {}", m.companion);
  if !m.context.is_empty() {
    println!("  context:   {}", m.context);
  }
  println!("  pleasure:  {}/10", m.pleasure_rating);
  println!("  comfort:   {}/10", m.comfort_rating);
  println!("  audacity:  {}/10", m.audacity_rating);
  println!("  top:       {}", tag_list(&m.top_tags));
  println!("  flop:      {}", tag_list(&m.flop_tags));
  if let Some(notes) = &m.personal_notes {
    println!("  notes:     {notes}");
  }
  if let Some(renew) = m.to_renew {
    println!("  again?     {renew}");
  }
  println!("  recorded:  {}", m.created_at.format("%Y-%m-%d %H:%M"));
}

fn print_stats(stats: &Statistics) {
  if stats.total == 0 {
    println!("No statistics yet.");
    return;
  }

  println!("Moments:  {}", stats.total);
  println!("Pleasure: {:.1} / 10", stats.avg_pleasure);
  println!("Comfort:  {:.1} / 10", stats.avg_comfort);
  println!("Audacity: {:.1} / 10", stats.avg_audacity);

  if !stats.top_locations.is_empty() {
    println!("Top locations:");
    for (rank, entry) in stats.top_locations.iter().enumerate() {
      println!(
        "  {}. {} ({}, {:.0}%)",
        rank + 1,
        entry.location,
        entry.count,
        stats.share(entry)
      );
    }
  }
}
