use std::collections::{BTreeMap, HashMap};

use crate::containers::BreakendRecord;
use crate::errors::Result;

/// Read access to a set of breakend records
pub trait RecordSource {
    /// All records in input order
    fn records(&self) -> Box<dyn Iterator<Item = &BreakendRecord> + '_>;

    /// Records on `chrom` with `start <= pos <= end`, in position order
    fn range_query(
        &self,
        chrom: &str,
        start: i64,
        end: i64,
    ) -> Box<dyn Iterator<Item = &BreakendRecord> + '_>;
}

/// Destination for records written in order
pub trait RecordSink {
    fn write_record(&mut self, record: &BreakendRecord) -> Result<()>;
}

impl RecordSink for Vec<BreakendRecord> {
    fn write_record(&mut self, record: &BreakendRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// In-memory record set with a per-chromosome position index
#[derive(Debug, Default)]
pub struct BreakendIndex {
    records: Vec<BreakendRecord>,
    positions: HashMap<String, BTreeMap<i64, Vec<usize>>>,
}

impl BreakendIndex {
    pub fn new(records: Vec<BreakendRecord>) -> Self {
        let mut positions: HashMap<String, BTreeMap<i64, Vec<usize>>> = HashMap::new();
        for (index, record) in records.iter().enumerate() {
            positions
                .entry(record.locus.chrom.clone())
                .or_default()
                .entry(record.locus.pos)
                .or_default()
                .push(index);
        }
        BreakendIndex { records, positions }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for BreakendIndex {
    fn records(&self) -> Box<dyn Iterator<Item = &BreakendRecord> + '_> {
        Box::new(self.records.iter())
    }

    fn range_query(
        &self,
        chrom: &str,
        start: i64,
        end: i64,
    ) -> Box<dyn Iterator<Item = &BreakendRecord> + '_> {
        let Some(chrom_positions) = self.positions.get(chrom) else {
            return Box::new(std::iter::empty());
        };
        if start > end {
            return Box::new(std::iter::empty());
        }
        Box::new(
            chrom_positions
                .range(start..=end)
                .flat_map(|(_, indices)| indices.iter())
                .map(|index| &self.records[*index]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{Locus, SvType};

    fn create_test_record(id: &str, chrom: &str, pos: i64) -> BreakendRecord {
        BreakendRecord::new(
            id.to_string(),
            Locus::new(chrom.to_string(), pos),
            "N".to_string(),
            "N[chr9:1[".to_string(),
            SvType::Bnd,
        )
    }

    fn create_test_index() -> BreakendIndex {
        BreakendIndex::new(vec![
            create_test_record("a", "chr1", 500),
            create_test_record("b", "chr1", 100),
            create_test_record("c", "chr2", 100),
            create_test_record("d", "chr1", 300),
            create_test_record("e", "chr1", 300),
        ])
    }

    fn ids<'a>(records: impl Iterator<Item = &'a BreakendRecord>) -> Vec<&'a str> {
        records.map(|record| record.id.as_str()).collect()
    }

    #[test]
    fn test_records_keep_input_order() {
        let index = create_test_index();
        assert_eq!(ids(index.records()), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(index.len(), 5);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_range_query_is_inclusive_and_sorted() {
        let index = create_test_index();
        assert_eq!(ids(index.range_query("chr1", 100, 300)), vec!["b", "d", "e"]);
        assert_eq!(ids(index.range_query("chr1", 101, 499)), vec!["d", "e"]);
        assert_eq!(ids(index.range_query("chr1", 500, 500)), vec!["a"]);
    }

    #[test]
    fn test_range_query_empty_cases() {
        let index = create_test_index();
        assert!(ids(index.range_query("chr3", 0, 1000)).is_empty());
        assert!(ids(index.range_query("chr1", 600, 700)).is_empty());
        assert!(ids(index.range_query("chr1", 400, 200)).is_empty());
        assert!(BreakendIndex::default().is_empty());
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<BreakendRecord> = Vec::new();
        let record = create_test_record("a", "chr1", 1);
        sink.write_record(&record).unwrap();
        assert_eq!(sink, vec![record]);
    }
}
