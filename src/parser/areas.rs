//! Intensity/area groupings from a headline's `Information` blocks.
//!
//! ```text
//! <Information type="震度速報">
//!   <Item>
//!     <Kind><Name>震度４</Name></Kind>
//!     <Areas codeType="地震情報／細分区域">
//!       <Area><Name>石川県能登</Name><Code>390</Code></Area>
//!     </Areas>
//!   </Item>
//! </Information>
//! ```

use roxmltree::Node;

use crate::error::Result;
use crate::models::AreaMap;
use crate::parser::document;

/// Separator between area names of one group.
pub const AREA_SEPARATOR: &str = "、";

/// `type` attribute of the municipal-level block in hypocenter/intensity reports.
pub const MUNICIPAL_INFORMATION: &str = "震源・震度に関する情報（市町村等）";

const CONTEXT: &str = "Headline/Information";

/// Extract groupings from the first `Information` block of a headline.
///
/// Later blocks are ignored.
pub fn extract_areas(headline: Node<'_, '_>) -> Result<AreaMap> {
    let information = document::require(headline, &["Information"], CONTEXT)?;
    select_areas(information)
}

/// Extract groupings from the municipal-level `Information` block.
///
/// Every block's `type` is checked, including when only one is present.
/// Without a municipal block the sentinel `{"Null": "No data."}` is returned.
pub fn extract_municipal_areas(headline: Node<'_, '_>) -> Result<AreaMap> {
    let municipal = document::children(headline, "Information")
        .find(|info| info.attribute("type") == Some(MUNICIPAL_INFORMATION));

    match municipal {
        Some(information) => select_areas(information),
        None => {
            log::debug!("No municipal Information block; using placeholder areas");
            Ok(no_data())
        }
    }
}

/// Render groupings as `"[label] areas"` lines.
pub fn labelled_lines(areas: &AreaMap) -> Vec<String> {
    areas
        .iter()
        .map(|(label, names)| format!("[{label}] {names}"))
        .collect()
}

/// Render groupings as bare joined area names, labels dropped.
pub fn area_names(areas: &AreaMap) -> Vec<String> {
    areas.values().cloned().collect()
}

fn select_areas(information: Node<'_, '_>) -> Result<AreaMap> {
    let mut groups = AreaMap::new();

    for item in document::children(information, "Item") {
        let label = document::require_text(item, &["Kind", "Name"], CONTEXT)?;
        let areas = document::require(item, &["Areas"], CONTEXT)?;
        let names = document::children(areas, "Area")
            .map(|area| document::require_text(area, &["Name"], CONTEXT))
            .collect::<Result<Vec<_>>>()?;

        // duplicate labels overwrite, keeping the first position
        groups.insert(label, names.join(AREA_SEPARATOR));
    }

    Ok(groups)
}

fn no_data() -> AreaMap {
    let mut groups = AreaMap::new();
    groups.insert("Null".to_string(), "No data.".to_string());
    groups
}
