use filetrack_location::{codec, Cluster};
use proptest::prelude::*;

fn cluster_strategy() -> impl Strategy<Value = Cluster> {
    prop::sample::select(Cluster::ALL.to_vec())
}

proptest! {
    #[test]
    fn decode_inverts_encode(cluster in cluster_strategy(), row in 0u8..=9, column in 0u8..=9) {
        let token = codec::encode(cluster, row, column);
        prop_assert_eq!(token.as_str().chars().count(), 3);

        let decoded = codec::decode(token.as_str()).unwrap();
        prop_assert_eq!((decoded.cluster, decoded.row, decoded.column), (cluster, row, column));
    }

    #[test]
    fn decode_rejects_any_other_length(token in "[A-Z0-9]{0,2}|[A-Z0-9]{4,8}") {
        prop_assert!(codec::decode(&token).is_err());
    }

    #[test]
    fn decode_rejects_letters_in_coordinates(cluster in cluster_strategy(), row in 0u8..=9, bad in "[A-Za-z]") {
        let token = format!("{}{}{}", cluster.code(), row, bad);
        prop_assert!(codec::decode(&token).is_err());
    }
}

#[test]
fn known_malformed_tokens_fail() {
    for token in ["C8X", "CC89", "9"] {
        assert!(codec::decode(token).is_err(), "{token} should not decode");
    }
}
