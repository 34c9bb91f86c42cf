/// Parse a `name=value; name=value` cookie line into pairs, skipping malformed entries.
pub(crate) fn parse_cookie_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            let k = k.trim();
            if k.is_empty() {
                return None;
            }
            Some((k.to_owned(), v.trim().to_owned()))
        })
        .collect()
}

pub(crate) fn encode_cookies<I>(pairs: I) -> String
where
    I: Iterator<Item = (String, String)>,
{
    pairs
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_and_encode() {
        let pairs = parse_cookie_pairs(" wt2=abc; __zp_stoken__=x=y ;broken; =nokey");
        assert_eq!(
            pairs,
            vec![
                ("wt2".to_owned(), "abc".to_owned()),
                ("__zp_stoken__".to_owned(), "x=y".to_owned())
            ]
        );
        assert_eq!(
            encode_cookies(pairs.into_iter()),
            "wt2=abc; __zp_stoken__=x=y"
        );
    }
}
