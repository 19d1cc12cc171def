use crate::error::Result;
use crate::store::{PropertyStore, StoredProperty};
use std::collections::BTreeMap;

/// Prints the stored properties. Without a locality the output is an
/// index of localities with counts; with one, every property stored
/// under that locality.
pub fn render(store: &PropertyStore, locality: Option<&str>) -> Result<()> {
    let properties = store.all()?;
    if properties.is_empty() {
        println!("No properties stored yet. Run the pipeline first.");
        return Ok(());
    }

    let grouped = group_by_locality(&properties);

    match locality {
        None => print_index(&grouped),
        Some(name) => match grouped.get(name) {
            Some(group) => {
                println!("{} ({} properties)\n", name, group.len());
                for property in group {
                    print_property(property);
                }
            }
            None => {
                println!("No stored properties in '{}'.", name);
                print_index(&grouped);
            }
        },
    }

    Ok(())
}

fn group_by_locality<'a>(
    properties: &'a [StoredProperty],
) -> BTreeMap<&'a str, Vec<&'a StoredProperty>> {
    let mut grouped: BTreeMap<&str, Vec<&StoredProperty>> = BTreeMap::new();
    for property in properties {
        grouped
            .entry(property.listing.locality.as_str())
            .or_default()
            .push(property);
    }
    grouped
}

fn print_index(grouped: &BTreeMap<&str, Vec<&StoredProperty>>) {
    println!("Stored properties by locality:\n");
    for (locality, group) in grouped {
        println!("  {} ({})", locality, group.len());
    }
    println!("\nPass a locality name to see its properties.");
}

fn print_property(property: &StoredProperty) {
    let listing = &property.listing;
    let evaluation = &property.evaluation;

    println!("== {} ==", listing.title);
    println!("  Price:      {}", listing.price);
    println!("  Location:   {}", listing.details.detailed_locality);
    println!("  Auction:    {}", listing.auction_number);
    println!("  Court:      {}", listing.details.court);
    println!("  Auctioneer: {}", listing.details.auctioneer);
    println!("  Link:       {}", listing.detail_link);
    println!("  Score:      {}/10 (evaluated {})", evaluation.score, property.evaluated_at);
    print_section("Positives", &evaluation.positives);
    print_section("Negatives", &evaluation.negatives);
    print_section("Payment terms", &listing.details.payment_terms);
    print_section("Description", &listing.details.full_description);
    println!();
}

fn print_section(label: &str, text: &str) {
    println!("  {}:", label);
    for line in text.lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardSummary, DetailFields, Evaluation, RawListing};
    use crate::store::ConflictPolicy;

    fn stored(store: &PropertyStore, title: &str, locality: &str, link: &str) {
        let listing = RawListing::from_parts(
            CardSummary {
                title: title.to_string(),
                price: "R$ 100.000,00".to_string(),
                locality: locality.to_string(),
                auction_number: "Leilão 1".to_string(),
                detail_link: link.to_string(),
            },
            DetailFields::default(),
        );
        let evaluation = Evaluation {
            score: 8,
            positives: "Preço baixo".to_string(),
            negatives: "Ocupado".to_string(),
        };
        store
            .insert(&listing, &evaluation, ConflictPolicy::IgnoreDuplicates)
            .unwrap();
    }

    #[test]
    fn groups_properties_by_locality() {
        let store = PropertyStore::open_in_memory().unwrap();
        stored(&store, "Casa X", "São Paulo - SP", "https://example.com/1");
        stored(&store, "Casa Y", "Campinas - SP", "https://example.com/2");
        stored(&store, "Casa Z", "São Paulo - SP", "https://example.com/3");

        let properties = store.all().unwrap();
        let grouped = group_by_locality(&properties);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["São Paulo - SP"].len(), 2);
        assert_eq!(grouped["Campinas - SP"].len(), 1);
    }

    #[test]
    fn render_handles_empty_and_unknown_localities() {
        let store = PropertyStore::open_in_memory().unwrap();
        render(&store, None).unwrap();
        render(&store, Some("Lugar Nenhum")).unwrap();

        stored(&store, "Casa X", "São Paulo - SP", "https://example.com/1");
        render(&store, None).unwrap();
        render(&store, Some("São Paulo - SP")).unwrap();
        render(&store, Some("Lugar Nenhum")).unwrap();
    }
}
