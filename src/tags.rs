/// Buckets tags for display by their leading one or two words, so related
/// tags (`Consolidation IFRS`, `Consolidation IFRS 16`) sit together.
/// Groups keep first-seen order; purely cosmetic, filtering never uses it.
pub fn group_tags(tags: &[String]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    for tag in tags {
        let key = group_key(tag);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(tag.clone()),
            None => groups.push((key, vec![tag.clone()])),
        }
    }

    groups
}

fn group_key(tag: &str) -> String {
    let mut words = tag.split(' ');
    let first = words.next().unwrap_or_default();
    match words.next() {
        Some(second) => format!("{} {}", first, second),
        None => first.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_word_tags_group_by_themselves() {
        let groups = group_tags(&strings(&["IFRS", "Budget", "IFRS"]));
        assert_eq!(
            groups,
            vec![
                ("IFRS".to_string(), strings(&["IFRS", "IFRS"])),
                ("Budget".to_string(), strings(&["Budget"])),
            ]
        );
    }

    #[test]
    fn test_multi_word_tags_group_by_first_two_words() {
        let groups = group_tags(&strings(&[
            "Contrôle de gestion",
            "Contrôle de gestion industriel",
            "Contrôle interne",
            "Power BI",
        ]));
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Contrôle de", "Contrôle interne", "Power BI"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_tags(&[]).is_empty());
    }
}
