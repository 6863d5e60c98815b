use crate::client::Client;
use crate::common::{key::Key, value::Item};
use crate::error::{Error, Result};
use crate::proto;
use crate::read;

/// A validated scan request.
///
/// The response is streamed in chunks and aggregated by the client; a chunk
/// reporting an error fails the whole call and discards what was buffered.
///
/// ```rust,no_run
/// use keystone_client::{Client, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// // one of four independent parallel segments
/// let scan = read::scan::Scan::builder()
///     .with_segment(0, 4)
///     .with_filter("attribute_exists(email)")
///     .build()?;
/// let output = scan.send(client).await?;
/// println!("{} of {} scanned items matched", output.count, output.scanned_count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan {
    pub(crate) multiple_read_args: read::common::MultipleReadArgs,
    pub(crate) segment: Option<(u32, u32)>,
}

impl Scan {
    /// Start building a scan.
    pub fn builder() -> ScanBuilder {
        ScanBuilder::default()
    }

    /// The `(segment, total_segments)` descriptor, if any.
    pub fn segment(&self) -> Option<(u32, u32)> {
        self.segment
    }

    /// Execute the scan and aggregate every chunk.
    pub async fn send(self, client: &Client) -> Result<ScanOutput> {
        client.scan(self).await
    }
}

/// Accumulates a scan request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanBuilder {
    multiple_read_args: read::common::MultipleReadArgs,
    segment: Option<(u32, u32)>,
}

read::common::impl_multiple_read_mutators!(ScanBuilder);

impl ScanBuilder {
    /// Scan only `segment` of `total_segments` parallel slices.
    pub fn with_segment(mut self, segment: u32, total_segments: u32) -> Self {
        self.segment = Some((segment, total_segments));
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<Scan> {
        if let Some((segment, total_segments)) = self.segment {
            if total_segments == 0 {
                return Err(Error::validation("total segments must be greater than zero"));
            }
            if segment >= total_segments {
                return Err(Error::validation(format!(
                    "segment {segment} is out of range for {total_segments} total segments"
                )));
            }
        }
        self.multiple_read_args.validate()?;
        Ok(Scan {
            multiple_read_args: self.multiple_read_args,
            segment: self.segment,
        })
    }
}

impl From<Scan> for proto::ScanRequest {
    fn from(scan: Scan) -> Self {
        let multiple_read_input: read::common::MultipleReadInput = scan.multiple_read_args.into();
        Self {
            filter_expression: multiple_read_input.filter_expression,
            expression_values: multiple_read_input.expression_values,
            limit: multiple_read_input.limit,
            exclusive_start_key: multiple_read_input.exclusive_start_key,
            index_name: multiple_read_input.index_name,
            segment: scan.segment.map(|(segment, _)| segment),
            total_segments: scan.segment.map(|(_, total_segments)| total_segments),
        }
    }
}

/// Aggregated result of a scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanOutput {
    /// Items of every chunk, in arrival order.
    pub items: Vec<Item>,
    /// Items returned, summed over chunks.
    pub count: u32,
    /// Items examined before filtering, summed over chunks.
    pub scanned_count: u32,
    /// Cursor reported by the last chunk that carried one.
    pub last_evaluated_key: Option<Key>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::value::AttributeValue;

    use rstest::rstest;
    use std::collections;

    #[rstest]
    #[case::first_of_four(0, 4, true)]
    #[case::last_of_four(3, 4, true)]
    #[case::segment_equals_total(4, 4, false)]
    #[case::segment_beyond_total(5, 4, false)]
    #[case::zero_total(0, 0, false)]
    fn test_segment_bounds(#[case] segment: u32, #[case] total_segments: u32, #[case] ok: bool) {
        let result = Scan::builder().with_segment(segment, total_segments).build();
        assert_eq!(result.is_ok(), ok);
        if let Err(error) = result {
            assert!(error.is_validation());
        }
    }

    #[rstest]
    #[case::empty(
        Scan::builder(),
        proto::ScanRequest::default()
    )]
    #[case::full(
        Scan::builder()
            .with_segment(1, 4)
            .with_filter("status = :s")
            .with_binding(":s", "open")
            .with_limit(100)
            .with_index("by-status")
            .start_after(Key::new("t#9")),
        proto::ScanRequest {
            filter_expression: Some("status = :s".to_string()),
            expression_values: collections::HashMap::from(
                [(":s".to_string(), AttributeValue::from("open").into())]
            ),
            limit: Some(100),
            exclusive_start_key: Some(proto::Key {
                partition_key: b"t#9".to_vec(),
                sort_key: None,
            }),
            index_name: Some("by-status".to_string()),
            segment: Some(1),
            total_segments: Some(4),
        }
    )]
    fn test_scan(#[case] builder: ScanBuilder, #[case] expected: proto::ScanRequest) {
        let actual: proto::ScanRequest = builder.build().unwrap().into();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_last_segment_call_wins() {
        let scan = Scan::builder()
            .with_segment(4, 4)
            .with_segment(2, 4)
            .build()
            .unwrap();
        assert_eq!(scan.segment(), Some((2, 4)));
    }

    #[rstest]
    #[case::unbound_filter(Scan::builder().with_filter("status = :s"))]
    #[case::zero_limit(Scan::builder().with_limit(0))]
    fn test_build_rejects(#[case] builder: ScanBuilder) {
        assert!(builder.build().unwrap_err().is_validation());
    }
}
