//! LiveSplit splits document (`.lss`)
//!
//! Personal-best split times are the attempt's snapped cumulative clock
//! (display offset included); best segment times come from the override
//! table when one was loaded.

use p2ds_common::timing::{snap_to_lss_time, ticks_to_seconds};
use p2ds_common::{AttemptResult, SplitConfig};

use crate::golds_file::OverrideTable;

/// Escape `& < > "` for element text and attribute values
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the `.lss` XML document for one attempt
pub fn build_lss(
    result: &AttemptResult,
    config: &SplitConfig,
    overrides: Option<&OverrideTable>,
) -> String {
    let lss = &config.lss;
    let mut doc = String::new();

    doc.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Run version="1.7.0">
  <GameIcon />
  <GameName>{}</GameName>
  <CategoryName>{}</CategoryName>
  <LayoutPath>
  </LayoutPath>
  <Metadata>
    <Run id="" />
    <Platform usesEmulator="False">{}</Platform>
    <Region>
    </Region>
    <Variables>"#,
        escape_xml(&lss.game_name),
        escape_xml(&lss.category_name),
        escape_xml(&lss.platform),
    ));
    for variable in &lss.variables {
        doc.push_str(&format!(
            "\n      <Variable name=\"{}\">{}</Variable>",
            escape_xml(&variable.name),
            escape_xml(&variable.value)
        ));
    }
    doc.push_str(&format!(
        r#"
    </Variables>
  </Metadata>
  <Offset>{}</Offset>
  <AttemptCount>1</AttemptCount>
  <AttemptHistory />
  <Segments>"#,
        escape_xml(&lss.header_offset)
    ));

    let mut cumulative = config.display_offset_secs;

    for id in config.canonical_ids() {
        let reached = result.group(id).filter(|g| g.ticks > 0);

        let (split_time, history) = match reached {
            Some(group) => {
                cumulative += ticks_to_seconds(group.ticks);
                let time = escape_xml(&snap_to_lss_time(cumulative));
                (
                    format!(
                        "<SplitTime name=\"Personal Best\">\n          <RealTime>{0}</RealTime>\n          <GameTime>{0}</GameTime>\n        </SplitTime>",
                        time
                    ),
                    format!(
                        "<SegmentHistory>\n        <Time id=\"1\">\n          <RealTime>{0}</RealTime>\n          <GameTime>{0}</GameTime>\n        </Time>\n      </SegmentHistory>",
                        time
                    ),
                )
            }
            None => (
                "<SplitTime name=\"Personal Best\" />".to_string(),
                "<SegmentHistory />".to_string(),
            ),
        };

        let best = match overrides.and_then(|table| table.get(id)) {
            Some(&seconds) => {
                let time = escape_xml(&snap_to_lss_time(seconds));
                format!(
                    "<BestSegmentTime>\n          <RealTime>{0}</RealTime>\n          <GameTime>{0}</GameTime>\n        </BestSegmentTime>",
                    time
                )
            }
            None => "<BestSegmentTime />".to_string(),
        };

        doc.push_str(&format!(
            "\n    <Segment>\n      <Name>{}</Name>\n      <Icon />\n      <SplitTimes>\n        {}\n      </SplitTimes>\n      {}\n      {}\n    </Segment>",
            escape_xml(config.segment_name(id)),
            split_time,
            best,
            history
        ));
    }

    doc.push_str("\n  </Segments>\n  <AutoSplitterSettings />\n</Run>");
    doc
}
