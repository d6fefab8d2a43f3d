//! Type-specific bulletin parsers.
//!
//! Each parser turns one detail document into a [`BulletinRecord`]. Only the
//! seismic intensity bulletin recovers from an unreadable document; every
//! other parser returns the error to the caller.

use roxmltree::Node;

use crate::error::{AppError, Result};
use crate::models::{BulletinKind, BulletinRecord, Identity, SeismicIntensity};
use crate::parser::{areas, document};

/// Info line used when an intensity bulletin cannot be read.
pub const FALLBACK_INFO: &str = "今後の情報に注意してください。";

/// Parse a detail document as `kind`.
///
/// Returns `Ok(None)` when the record is filtered out by severity.
pub fn parse_bulletin(kind: BulletinKind, xml: &str, url: &str) -> Result<Option<BulletinRecord>> {
    match kind {
        BulletinKind::IntensityBulletin => Ok(Some(parse_intensity_bulletin(xml, url))),
        BulletinKind::Hypocenter => parse_hypocenter(xml, url).map(Some),
        BulletinKind::HypocenterIntensity => parse_hypocenter_intensity(xml, url),
        BulletinKind::EarlyWarningForecast => parse_early_warning_forecast(xml, url).map(Some),
        BulletinKind::EarlyWarningAlarm => parse_early_warning_alarm(xml, url).map(Some),
        BulletinKind::Tsunami => parse_tsunami(xml, url).map(Some),
    }
}

/// 震度速報: headline, labelled intensity groups and forecast comment.
///
/// Never fails. Malformed XML, or a document lacking the title, headline
/// text or event id, yields [`intensity_fallback`], which is broadcast like
/// any other record. A headline without an `Information` block (such as a
/// cancellation) is read normally and carries no areas.
pub fn parse_intensity_bulletin(xml: &str, url: &str) -> BulletinRecord {
    try_parse_intensity_bulletin(xml, url).unwrap_or_else(|e| {
        log::warn!("Unreadable intensity bulletin {}: {}. Using placeholder.", url, e);
        intensity_fallback(url)
    })
}

/// Placeholder record for an intensity bulletin that could not be read.
pub fn intensity_fallback(url: &str) -> BulletinRecord {
    let kind = BulletinKind::IntensityBulletin;
    let mut record = BulletinRecord::new(
        kind,
        kind.display_title().unwrap_or_default(),
        "No data.",
        Identity::new("0", url),
    );
    record.areas = Some(vec!["[N/A] No data.".to_string()]);
    record.info = Some(FALLBACK_INFO.to_string());
    record
}

fn try_parse_intensity_bulletin(xml: &str, url: &str) -> Result<BulletinRecord> {
    let doc = document::parse(xml)?;
    let report = report_root(doc.root_element())?;
    let kind = BulletinKind::IntensityBulletin;

    let mut record = base_record(report, kind, url)?;
    let headline = headline(report, kind)?;
    if document::child(headline, "Information").is_some() {
        let groups = areas::extract_areas(headline)?;
        record.areas = Some(areas::labelled_lines(&groups));
    }
    record.info = forecast_comment(report);
    Ok(record)
}

/// 震源に関する情報: epicenter, magnitude and forecast comment.
pub fn parse_hypocenter(xml: &str, url: &str) -> Result<BulletinRecord> {
    let doc = document::parse(xml)?;
    let report = report_root(doc.root_element())?;
    let kind = BulletinKind::Hypocenter;

    let mut record = base_record(report, kind, url)?;
    fill_hypocenter(report, kind, &mut record)?;
    record.info = forecast_comment(report);
    Ok(record)
}

/// 震源・震度に関する情報: hypocenter fields plus maximum intensity and
/// municipal intensity groups.
///
/// Returns `Ok(None)` below intensity 3 or for an unrecognized `MaxInt`.
pub fn parse_hypocenter_intensity(xml: &str, url: &str) -> Result<Option<BulletinRecord>> {
    let doc = document::parse(xml)?;
    let report = report_root(doc.root_element())?;
    let kind = BulletinKind::HypocenterIntensity;

    let mut record = base_record(report, kind, url)?;
    fill_hypocenter(report, kind, &mut record)?;
    record.info = forecast_comment(report);

    let max_intensity = document::text_at(report, &["Body", "Intensity", "Observation", "MaxInt"]);
    let headline = headline(report, kind)?;
    if document::child(headline, "Information").is_some() {
        let groups = areas::extract_municipal_areas(headline)?;
        record.areas = Some(areas::labelled_lines(&groups));
    }

    match max_intensity {
        Some(level) if SeismicIntensity::is_reportable(&level) => {
            record.max_intensity = Some(level);
            Ok(Some(record))
        }
        level => {
            log::debug!(
                "Dropping {} with max intensity {:?}",
                record.identity,
                level.as_deref().unwrap_or("none")
            );
            Ok(None)
        }
    }
}

/// 緊急地震速報（予報）: headline only.
pub fn parse_early_warning_forecast(xml: &str, url: &str) -> Result<BulletinRecord> {
    let doc = document::parse(xml)?;
    let report = report_root(doc.root_element())?;
    base_record(report, BulletinKind::EarlyWarningForecast, url)
}

/// 緊急地震速報（警報）: headline and the affected area names, labels dropped.
pub fn parse_early_warning_alarm(xml: &str, url: &str) -> Result<BulletinRecord> {
    let doc = document::parse(xml)?;
    let report = report_root(doc.root_element())?;
    let kind = BulletinKind::EarlyWarningAlarm;

    let mut record = base_record(report, kind, url)?;
    let groups = areas::extract_areas(headline(report, kind)?)?;
    record.areas = Some(areas::area_names(&groups));
    Ok(record)
}

/// Tsunami family: title from the document, first group's areas as `area`.
///
/// Forecasts carry no `Information` block and get no area.
pub fn parse_tsunami(xml: &str, url: &str) -> Result<BulletinRecord> {
    let doc = document::parse(xml)?;
    let report = report_root(doc.root_element())?;
    let kind = BulletinKind::Tsunami;

    let mut record = base_record(report, kind, url)?;
    let headline = headline(report, kind)?;
    if document::child(headline, "Information").is_some() {
        let groups = areas::extract_areas(headline)?;
        record.area = groups.values().next().cloned();
    }
    Ok(record)
}

fn report_root<'a, 'input>(root: Node<'a, 'input>) -> Result<Node<'a, 'input>> {
    if root.tag_name().name() == "Report" {
        Ok(root)
    } else {
        Err(AppError::parse(
            "document",
            format!("expected <Report>, found <{}>", root.tag_name().name()),
        ))
    }
}

fn headline<'a, 'input: 'a>(report: Node<'a, 'input>, kind: BulletinKind) -> Result<Node<'a, 'input>> {
    document::require(report, &["Head", "Headline"], &kind.to_string())
}

fn base_record(report: Node<'_, '_>, kind: BulletinKind, url: &str) -> Result<BulletinRecord> {
    let context = kind.to_string();
    let title = match kind.display_title() {
        Some(title) => title.to_string(),
        None => document::require_text(report, &["Head", "Title"], &context)?,
    };
    let body = document::require_text(report, &["Head", "Headline", "Text"], &context)?;
    let event_id = document::require_text(report, &["Head", "EventID"], &context)?;

    Ok(BulletinRecord::new(kind, title, body, Identity::new(event_id, url)))
}

fn fill_hypocenter(report: Node<'_, '_>, kind: BulletinKind, record: &mut BulletinRecord) -> Result<()> {
    let context = kind.to_string();
    let earthquake = document::require(report, &["Body", "Earthquake"], &context)?;
    record.magnitude = Some(document::require_text(earthquake, &["Magnitude"], &context)?);
    record.area = Some(document::require_text(
        earthquake,
        &["Hypocenter", "Area", "Name"],
        &context,
    )?);
    Ok(())
}

fn forecast_comment(report: Node<'_, '_>) -> Option<String> {
    document::text_at(report, &["Body", "Comments", "ForecastComment", "Text"])
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.jma/data/doc.xml";

    const INTENSITY: &str = include_str!("../../tests/fixtures/intensity_bulletin.xml");
    const HYPOCENTER: &str = include_str!("../../tests/fixtures/hypocenter.xml");
    const HYPOCENTER_INTENSITY: &str = include_str!("../../tests/fixtures/hypocenter_intensity.xml");
    const EEW_FORECAST: &str = include_str!("../../tests/fixtures/early_warning_forecast.xml");
    const EEW_ALARM: &str = include_str!("../../tests/fixtures/early_warning_alarm.xml");
    const TSUNAMI_WARNING: &str = include_str!("../../tests/fixtures/tsunami_warning.xml");
    const TSUNAMI_FORECAST: &str = include_str!("../../tests/fixtures/tsunami_forecast.xml");

    fn with_max_intensity(level: &str) -> String {
        HYPOCENTER_INTENSITY.replace("<MaxInt>4</MaxInt>", &format!("<MaxInt>{level}</MaxInt>"))
    }

    #[test]
    fn test_intensity_bulletin() {
        let record = parse_intensity_bulletin(INTENSITY, URL);
        assert_eq!(record.title, "震度速報");
        assert!(record.body.starts_with("１日１６時１０分ころ"));
        assert_eq!(
            record.areas,
            Some(vec![
                "[震度７] 石川県能登".to_string(),
                "[震度６弱] 新潟県中越、新潟県上越".to_string(),
            ])
        );
        assert_eq!(record.info.as_deref(), Some("今後の情報に注意してください。"));
        assert_eq!(record.identity, Identity::new("20240101161010", URL));
    }

    #[test]
    fn test_intensity_bulletin_falls_back_on_malformed_xml() {
        let record = parse_intensity_bulletin("<Report><Head>", URL);
        assert_eq!(record, intensity_fallback(URL));
        assert_eq!(record.body, "No data.");
        assert_eq!(record.identity.event_id, "0");
        assert_eq!(record.areas, Some(vec!["[N/A] No data.".to_string()]));
    }

    #[test]
    fn test_intensity_bulletin_falls_back_on_missing_nodes() {
        let record = parse_intensity_bulletin("<Report><Head/></Report>", URL);
        assert_eq!(record.body, "No data.");
    }

    #[test]
    fn test_intensity_cancellation_is_not_a_placeholder() {
        let xml = r#"<Report>
  <Head>
    <Title>震度速報</Title>
    <EventID>20240101161010</EventID>
    <InfoType>取消</InfoType>
    <Headline>
      <Text>先ほどの震度速報を取り消します。</Text>
    </Headline>
  </Head>
</Report>"#;

        let record = parse_intensity_bulletin(xml, URL);
        assert_eq!(record.body, "先ほどの震度速報を取り消します。");
        assert_eq!(record.identity, Identity::new("20240101161010", URL));
        assert!(record.areas.is_none());
        assert!(record.info.is_none());
    }

    #[test]
    fn test_hypocenter() {
        let record = parse_hypocenter(HYPOCENTER, URL).unwrap();
        assert_eq!(record.title, "震源に関する情報");
        assert_eq!(record.magnitude.as_deref(), Some("4.2"));
        assert_eq!(record.area.as_deref(), Some("千葉県東方沖"));
        assert_eq!(record.info.as_deref(), Some("この地震による津波の心配はありません。"));
        assert!(record.max_intensity.is_none());
        assert!(record.areas.is_none());
    }

    #[test]
    fn test_hypocenter_propagates_malformed_xml() {
        assert!(parse_hypocenter("<Report>", URL).is_err());
    }

    #[test]
    fn test_hypocenter_intensity_uses_municipal_block() {
        let record = parse_hypocenter_intensity(HYPOCENTER_INTENSITY, URL)
            .unwrap()
            .unwrap();
        assert_eq!(record.title, "震源・震度に関する情報");
        assert_eq!(record.max_intensity.as_deref(), Some("4"));
        assert_eq!(record.area.as_deref(), Some("茨城県南部"));
        assert_eq!(
            record.areas,
            Some(vec![
                "[震度４] 土浦市".to_string(),
                "[震度３] 水戸市、つくば市".to_string(),
            ])
        );
    }

    #[test]
    fn test_severity_filter() {
        let parse = |level: &str| parse_hypocenter_intensity(&with_max_intensity(level), URL).unwrap();
        assert!(parse("2").is_none());
        assert!(parse("3").is_some());
        assert!(parse("5-").is_some());
        assert!(parse("7").is_some());
        assert!(parse("5").is_none());
    }

    #[test]
    fn test_hypocenter_intensity_without_information_has_no_areas() {
        let start = HYPOCENTER_INTENSITY.find("<Information").unwrap();
        let end = HYPOCENTER_INTENSITY.rfind("</Information>").unwrap() + "</Information>".len();
        let xml = format!("{}{}", &HYPOCENTER_INTENSITY[..start], &HYPOCENTER_INTENSITY[end..]);

        let record = parse_hypocenter_intensity(&xml, URL).unwrap().unwrap();
        assert!(record.areas.is_none());
    }

    #[test]
    fn test_early_warning_forecast() {
        let record = parse_early_warning_forecast(EEW_FORECAST, URL).unwrap();
        assert_eq!(record.title, "緊急地震速報(予報)");
        assert_eq!(record.body, "");
        assert_eq!(record.identity.event_id, "20240104080000");
        assert!(record.areas.is_none());
        assert!(record.magnitude.is_none());
    }

    #[test]
    fn test_early_warning_alarm_lists_area_names() {
        let record = parse_early_warning_alarm(EEW_ALARM, URL).unwrap();
        assert_eq!(record.title, "緊急地震速報 (警報)");
        assert_eq!(record.areas, Some(vec!["石川県、富山県".to_string()]));
    }

    #[test]
    fn test_tsunami_warning_takes_first_group() {
        let record = parse_tsunami(TSUNAMI_WARNING, URL).unwrap();
        assert_eq!(record.title, "大津波警報・津波警報・津波注意報・津波予報");
        assert_eq!(record.area.as_deref(), Some("石川県能登"));
    }

    #[test]
    fn test_tsunami_forecast_without_areas() {
        let record = parse_tsunami(TSUNAMI_FORECAST, URL).unwrap();
        assert_eq!(record.title, "津波予報");
        assert!(record.area.is_none());
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let err = parse_early_warning_forecast("<feed/>", URL).unwrap_err();
        assert!(err.is_document_error());
    }
}
