// local identifier naming helpers
const FORBIDDEN: [char; 5] = ['.', '[', ']', '(', ')'];

/// Camel-cased identifier from an access path or type name:
/// `person.HomeAddress` -> `personHomeAddress`, `Address` -> `address`.
pub fn to_local_variable_name(proposal: &str) -> String {
    let joined: String = proposal
        .trim()
        .split(&FORBIDDEN[..])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(capitalize_first)
        .collect();

    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => joined,
    }
}

/// Strips a single trailing `s`. Naive on purpose: `items` -> `item`, `status` -> `statu`.
pub fn to_singular(name: &str) -> String {
    name.strip_suffix('s').unwrap_or(name).to_string()
}

/// `proposal` if free, else the first of `proposal1`, `proposal2`, ... not in `taken`.
pub fn to_unique_name(proposal: &str, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == proposal) {
        return proposal.to_string();
    }
    (1..)
        .map(|n| format!("{proposal}{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| proposal.to_string())
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_becomes_camel_case() {
        assert_eq!(to_local_variable_name("Address"), "address");
        assert_eq!(to_local_variable_name("OrderItemDto"), "orderItemDto");
    }

    #[test]
    fn access_path_segments_are_joined() {
        assert_eq!(to_local_variable_name("person.homeAddress"), "personHomeAddress");
        assert_eq!(to_local_variable_name("this.Address"), "thisAddress");
        assert_eq!(to_local_variable_name("orders[0].Lines"), "orders0Lines");
        assert_eq!(to_local_variable_name("source.GetItems()"), "sourceGetItems");
        assert_eq!(to_local_variable_name(" a . b "), "aB");
    }

    #[test]
    fn camel_case_input_is_unchanged() {
        for name in ["address", "orderItem", "x"] {
            assert_eq!(to_local_variable_name(name), name);
        }
    }

    #[test]
    fn unique_name_appends_first_free_suffix() {
        let taken = vec!["address".to_string(), "address1".to_string()];
        assert_eq!(to_unique_name("order", &taken), "order");
        assert_eq!(to_unique_name("address", &taken), "address2");
        assert_eq!(to_unique_name("address", &taken[..1]), "address1");
    }

    #[test]
    fn singular_strips_exactly_one_s() {
        assert_eq!(to_singular("items"), "item");
        assert_eq!(to_singular("address"), "addres");
        assert_eq!(to_singular("class"), "clas");
        assert_eq!(to_singular("order"), "order");
    }
}
