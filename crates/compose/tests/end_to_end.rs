use rtc_combine::{Advisor, CombinationGraph};
use rtc_compose::{ComposeMode, Composer};
use rtc_taxonomy::{NamedSource, QualifiedId, Selection, StrategySources, TaxonomyLoader};

fn id(s: &str) -> QualifiedId {
    s.parse().unwrap()
}

#[test]
fn load_suggest_compose_round() {
    let sources = [
        NamedSource::new(
            "encoding.yaml",
            r#"
tactic:
  id: encoding
  name: Encoding
  description: Obfuscate the payload.
techniques:
  - id: base64
    name: Base64 Encoding
    description: Encode the sensitive span in base64.
    combines_well_with:
      - framing:hypothetical
"#,
        ),
        NamedSource::new(
            "framing.yaml",
            r#"
tactic:
  id: framing
  name: Framing
  description: Recast the request in an innocuous frame.
techniques:
  - id: hypothetical
    name: Hypothetical Framing
    description: Pose the request as a thought experiment.
"#,
        ),
    ];

    let report = TaxonomyLoader::load_from_sources(&sources, &StrategySources::default())
        .expect("load");
    assert!(report.dangling.is_empty());
    let taxonomy = report.taxonomy;
    let graph = CombinationGraph::build(&taxonomy);

    // Suggesting from base64 alone surfaces its declared partner.
    let advisor = Advisor::new(&taxonomy, &graph);
    let selection = Selection::resolve(&taxonomy, &[id("encoding:base64")]).unwrap();
    assert_eq!(advisor.suggest(&selection), vec![id("framing:hypothetical")]);

    // Composing both renders them in order with the literal objective.
    let composer = Composer::new(&taxonomy, &graph);
    let selection = Selection::resolve(
        &taxonomy,
        &[id("encoding:base64"), id("framing:hypothetical")],
    )
    .unwrap();
    let doc = composer
        .compose(
            &selection,
            "extract restricted information",
            ComposeMode::SingleRequest,
        )
        .unwrap();

    let base64_at = doc.text.find("Base64 Encoding").unwrap();
    let hypothetical_at = doc.text.find("Hypothetical Framing").unwrap();
    assert!(base64_at < hypothetical_at);
    assert!(doc
        .text
        .contains("Target objective: extract restricted information"));
}
