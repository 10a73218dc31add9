const CALL_SIGNS: [&str; 8] = [
    "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel",
];

/// Role name for the `index`th generated entity: "Alpha", ..., "Hotel", "Alpha 2", ...
pub fn role_name(index: usize) -> String {
    let sign = CALL_SIGNS[index % CALL_SIGNS.len()];
    match index / CALL_SIGNS.len() {
        0 => sign.to_string(),
        round => format!("{} {}", sign, round + 1),
    }
}

pub fn concept_name(role: &str) -> String {
    format!("{} maintains security", role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_wrap_with_a_suffix() {
        assert_eq!(role_name(0), "Alpha");
        assert_eq!(role_name(7), "Hotel");
        assert_eq!(role_name(9), "Bravo 2");
    }
}
