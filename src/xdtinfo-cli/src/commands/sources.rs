//! Item source lookup

use anyhow::Result;
use std::path::Path;
use xdtinfo::{ItemKey, Odds, Source, SourceRecord};

/// Items whose key equals `query` or whose name contains it (case-insensitive)
pub fn matching<'a>(items: impl IntoIterator<Item = (&'a ItemKey, &'a str)>, query: &str) -> Vec<ItemKey> {
    let exact = query.parse::<ItemKey>().ok();
    let needle = query.to_lowercase();
    items
        .into_iter()
        .filter(|(key, name)| Some(**key) == exact || name.to_lowercase().contains(&needle))
        .map(|(key, _)| *key)
        .collect()
}

/// Sources by male probability, highest first; ties keep their order
pub fn ranked(records: &[SourceRecord]) -> Vec<&SourceRecord> {
    let mut sorted: Vec<&SourceRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.male_odds().cmp(&a.male_odds()));
    sorted
}

fn percent(odds: &Odds) -> String {
    format!("{:.4}%", odds.to_f64() * 100.0)
}

/// Where the source is, when it has a place
fn location(source: &Source) -> &str {
    match source {
        Source::Vendor(s) => &s.npc.area,
        Source::SpecialZone(s) => &s.npc.area,
        Source::MissionReward(s) => &s.npc.area,
        Source::Collectible(s) => &s.area,
        Source::Kill(s) => &s.area,
        Source::Code(_) | Source::Event(_) => "-",
    }
}

pub fn handle(build_dir: &Path, server_data_dir: &Path, query: &str, patches: &[String]) -> Result<()> {
    let derived = super::derive_one(build_dir, server_data_dir, patches)?;
    let entities = &derived.entities;

    let keys = matching(entities.items.iter().map(|(k, i)| (k, i.name.as_str())), query);
    if keys.is_empty() {
        println!("No items match '{}'", query);
        println!("\nTry a partial name or a \"slot::id\" key like 00::0005");
        return Ok(());
    }

    for key in keys {
        let obtainable = entities.items.get(&key).is_some_and(|i| i.obtainable);
        println!(
            "{} {}{}",
            key,
            entities.item_name(&key),
            if obtainable { "" } else { " (not obtainable)" }
        );

        let records = ranked(derived.sources.sources_of(&key));
        if records.is_empty() {
            println!("  No sources\n");
            continue;
        }
        println!(
            "  {:<20} {:<40} {:<32} {:>10} {:>10}",
            "Kind", "Source", "Area", "Male", "Female"
        );
        println!("  {}", "-".repeat(116));
        for record in records {
            let female = record
                .odds
                .as_ref()
                .map_or_else(Odds::one, |o| o.female.clone());
            println!(
                "  {:<20} {:<40} {:<32} {:>10} {:>10}",
                record.kind.to_string(),
                record.source.tag(),
                location(&record.source),
                percent(&record.male_odds()),
                percent(&female)
            );
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdtinfo::sources::CodeSource;
    use xdtinfo::{GenderedOdds, SourceKind};

    fn code(name: &str, odds: Option<(i64, i64)>) -> SourceRecord {
        let record = SourceRecord::new(
            SourceKind::Code,
            Source::Code(CodeSource {
                code: name.to_string(),
            }),
        );
        match odds {
            Some((n, d)) => record.with_odds(GenderedOdds::uniform(Odds::ratio_or_zero(n, d))),
            None => record,
        }
    }

    #[test]
    fn test_ranked_highest_first() {
        let records = vec![code("LOW", Some((1, 10))), code("ALWAYS", None), code("HIGH", Some((1, 2)))];
        let order: Vec<String> = ranked(&records).iter().map(|r| r.source.tag()).collect();
        assert_eq!(order, vec!["ALWAYS", "HIGH", "LOW"]);
    }

    #[test]
    fn test_matching_by_name_or_key() {
        let keys = [ItemKey::new(0, 5), ItemKey::new(9, 1), ItemKey::new(9, 2)];
        let names = ["Blaster", "Mystery Box", "12Lv Mystery Box"];
        let items = || keys.iter().zip(names);

        assert_eq!(matching(items(), "mystery"), vec![keys[1], keys[2]]);
        assert_eq!(matching(items(), "00::0005"), vec![keys[0]]);
        assert!(matching(items(), "Sword").is_empty());
    }

    #[test]
    fn test_percent_rendering() {
        assert_eq!(percent(&Odds::ratio_or_zero(1, 8)), "12.5000%");
    }
}
