//! Partitions quote pieces into per-material buckets.

use indexmap::IndexMap;

use crate::model::{PieceRequest, Quote};

/// Material buckets in first-seen order. Pieces keep their relative
/// order within and across quotes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialGroups {
    groups: IndexMap<String, Vec<PieceRequest>>,
}

impl MaterialGroups {
    fn push(&mut self, piece: &PieceRequest) {
        self.groups
            .entry(piece.material.clone())
            .or_default()
            .push(piece.clone());
    }

    pub fn get(&self, material: &str) -> Option<&[PieceRequest]> {
        self.groups.get(material).map(Vec::as_slice)
    }

    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl IntoIterator for MaterialGroups {
    type Item = (String, Vec<PieceRequest>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<PieceRequest>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

pub fn group_by_material(quote: &Quote) -> MaterialGroups {
    group_quotes(std::slice::from_ref(quote))
}

pub fn group_quotes(quotes: &[Quote]) -> MaterialGroups {
    let mut groups = MaterialGroups::default();
    for piece in quotes.iter().flat_map(|q| &q.pieces) {
        groups.push(piece);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(id: &str, material: &str) -> PieceRequest {
        PieceRequest::new(id, 0.5, 0.3, 1).with_material(material)
    }

    fn ids(pieces: &[PieceRequest]) -> Vec<&str> {
        pieces.iter().map(|p| p.piece_id.as_str()).collect()
    }

    #[test]
    fn test_single_quote() {
        let quote = Quote {
            name: "closet".into(),
            pieces: vec![
                piece("side", "MDF"),
                piece("door", "Melamine"),
                piece("top", "MDF"),
            ],
        };
        let groups = group_by_material(&quote);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.materials().collect::<Vec<_>>(), ["MDF", "Melamine"]);
        assert_eq!(ids(groups.get("MDF").unwrap()), ["side", "top"]);
        assert_eq!(ids(groups.get("Melamine").unwrap()), ["door"]);
        assert!(groups.get("Oak").is_none());
    }

    #[test]
    fn test_merge_preserves_order_across_quotes() {
        let quotes = [
            Quote {
                name: "a".into(),
                pieces: vec![piece("a1", "MDF"), piece("a2", "Tube")],
            },
            Quote {
                name: "b".into(),
                pieces: vec![piece("b1", "Tube"), piece("b2", "MDF")],
            },
        ];
        let groups = group_quotes(&quotes);
        assert_eq!(ids(groups.get("MDF").unwrap()), ["a1", "b2"]);
        assert_eq!(ids(groups.get("Tube").unwrap()), ["a2", "b1"]);
        assert_eq!(group_quotes(&quotes), groups);
    }

    #[test]
    fn test_into_iter_keeps_first_seen_order() {
        let quote = Quote {
            name: "kitchen".into(),
            pieces: vec![
                piece("k1", "Tube"),
                piece("k2", "MDF"),
                piece("k3", "Oak"),
                piece("k4", "MDF"),
                piece("k5", "Tube"),
            ],
        };
        let order: Vec<(String, usize)> = group_by_material(&quote)
            .into_iter()
            .map(|(name, pieces)| (name, pieces.len()))
            .collect();
        assert_eq!(
            order,
            [("Tube".to_string(), 2), ("MDF".to_string(), 2), ("Oak".to_string(), 1)]
        );
    }

    #[test]
    fn test_empty() {
        assert!(group_quotes(&[]).is_empty());
        assert!(group_by_material(&Quote::default()).is_empty());
    }
}
