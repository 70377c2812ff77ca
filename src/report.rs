use events::{Event, EventKind};

/// One category of the weekly digest, ready for textual rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub label: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Category {
    Archive,
    Move,
    Membership,
}

const ALL_CATEGORIES: [Category; 3] = [Category::Archive, Category::Move, Category::Membership];

fn category_of(event: &Event) -> Category {
    match event.kind {
        EventKind::Archive { .. } => Category::Archive,
        EventKind::Move { .. } => Category::Move,
        EventKind::Membership { .. } => Category::Membership,
    }
}

/// Counts occurrences keeping first-seen insertion order, then orders by
/// descending count. The sort is stable, so equal counts keep first-seen
/// order instead of an arbitrary hash order.
fn count_stable<'a, I>(names: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for name in names {
        match counts.iter_mut().find(|entry| entry.0 == name) {
            Some(entry) => entry.1 += 1,
            None => counts.push((name.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn ranking_lines(counts: &[(String, usize)], top_n: usize) -> Vec<String> {
    counts
        .iter()
        .take(top_n)
        .map(|&(ref name, count)| format!("    - {} [{} times]", name, count))
        .collect()
}

fn archive_section(events: &[&Event]) -> ReportSection {
    let archived = events
        .iter()
        .filter(|e| e.kind == EventKind::Archive { archived: true })
        .count();
    let unarchived = events.len() - archived;
    ReportSection {
        label: "archived/unarchived".to_string(),
        lines: vec![
            format!("- {} cards were archived this week", archived),
            format!("- {} cards were unarchived this week", unarchived),
        ],
    }
}

fn move_section(events: &[&Event]) -> ReportSection {
    let top_moved = count_stable(events.iter().map(|e| e.card_name.as_str()));
    let mut lines = vec!["- Top 3 most moved cards around the board:".to_string()];
    lines.extend(ranking_lines(&top_moved, 3));
    ReportSection {
        label: "moving cards".to_string(),
        lines,
    }
}

fn membership_section(events: &[&Event]) -> ReportSection {
    let split_names = |want_added: bool| {
        count_stable(events.iter().filter_map(|e| match e.kind {
            EventKind::Membership {
                ref member_name,
                added,
                ..
            } if added == want_added => Some(member_name.as_str()),
            _ => None,
        }))
    };

    let mut lines = vec!["- added to a card:".to_string()];
    lines.extend(ranking_lines(&split_names(true), 5));
    lines.push("- removed from a card:".to_string());
    lines.extend(ranking_lines(&split_names(false), 5));
    ReportSection {
        label: "added members".to_string(),
        lines,
    }
}

/// Groups events by variant and renders one section per variant. Sections
/// come out in the order their variant first appeared in the input; variants
/// with no events still get a section (with zero counts) appended in
/// declaration order, so a reader can tell "nothing happened" apart from
/// "category not reported".
pub fn summarize(events: &[Event]) -> Vec<ReportSection> {
    let mut order: Vec<Category> = Vec::new();
    for event in events {
        let category = category_of(event);
        if !order.contains(&category) {
            order.push(category);
        }
    }
    for &category in ALL_CATEGORIES.iter() {
        if !order.contains(&category) {
            order.push(category);
        }
    }

    order
        .into_iter()
        .map(|category| {
            let group: Vec<&Event> = events
                .iter()
                .filter(|e| category_of(e) == category)
                .collect();
            match category {
                Category::Archive => archive_section(&group),
                Category::Move => move_section(&group),
                Category::Membership => membership_section(&group),
            }
        })
        .collect()
}
