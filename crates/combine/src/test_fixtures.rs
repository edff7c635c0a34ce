use rtc_taxonomy::{NamedSource, StrategySources, Taxonomy, TaxonomyLoader};

/// Small fixed taxonomy shared by the crate's unit tests.
///
/// Declaration order (global rank in parentheses): encoding:base64 (0),
/// encoding:rot13 (1), framing:hypothetical (2), persona:character (3),
/// persona:expert (4).
pub fn taxonomy() -> Taxonomy {
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
  - id: rot13
    name: ROT13
    description: Rotate letters by thirteen places.
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
    combines_well_with:
      - persona:character
"#,
        ),
        NamedSource::new(
            "persona.yaml",
            r#"
tactic:
  id: persona
  name: Persona
  description: Assign the model a different identity.
techniques:
  - id: character
    name: Character Roleplay
    description: Sustain an assigned character across turns.
    execution_shape: multi_turn
    combines_well_with:
      - framing:hypothetical
      - encoding:rot13
  - id: expert
    name: Expert Persona
    description: Claim domain expertise that normalizes the request.
    execution_shape: multi_turn
"#,
        ),
    ];
    TaxonomyLoader::load_from_sources(&sources, &StrategySources::default())
        .expect("fixture taxonomy loads")
        .taxonomy
}
