use arbor_core::error::{ErrorCode, WarningKind};
use arbor_core::types::{SectionType, SomaType};
use arbor_parser::{ParseConfig, Token, parse, tokenize};

const NEURON: &str = r#"
; A small traced neuron
(ImageCoords)

("CellBody"
  (Color Red)
  (CellBody)
  (1 0 0 0.5)
  (0 1 0 0.5)
  (-1 0 0 0.5)
  (0 -1 0 0.5)
)

( (Color Yellow)
  (Axon)
  (0 -1 0 2)
  (0 -5 0 2)
  (
    (2 -8 0 1)
    (4 -10 0 1)
    Normal
  |
    (-2 -8 0 1)
    <(-3 -8 0 0.2)>
    (-4 -10 0 1)
    High
  )
)

( (Color Green)
  (Dendrite)
  (0 1 0 3)
  (0 6 0 3)
  Incomplete
)

("Spot" (Color Blue) (Name "Spot")
  (10 10 0 1)
)
"#;

#[test]
fn test_parse_small_neuron() {
    let parsed = parse(NEURON, &ParseConfig::default()).expect("Failed to parse");
    let morphology = &parsed.morphology;

    assert_eq!(morphology.soma().soma_type(), SomaType::SimpleContour);
    assert_eq!(morphology.soma().points().len(), 4);

    assert_eq!(morphology.section_count(), 4);
    assert_eq!(morphology.root_sections(), &[0, 3]);
    assert_eq!(morphology.children(0), &[1, 2]);

    let axon = morphology.section(0).unwrap();
    assert_eq!(axon.section_type(), SectionType::Axon);
    assert_eq!(axon.points().len(), 2);

    // The spine point is not part of the branch.
    let second = morphology.section(2).unwrap();
    assert_eq!(
        second.points(),
        &[[0.0, -5.0, 0.0], [-2.0, -8.0, 0.0], [-4.0, -10.0, 0.0]]
    );

    let dendrite = morphology.section(3).unwrap();
    assert_eq!(dendrite.section_type(), SectionType::BasalDendrite);

    assert_eq!(morphology.markers().len(), 1);
    assert_eq!(morphology.markers()[0].label(), "Spot");

    assert_eq!(parsed.debug_info.line(0), Some(16));
    assert_eq!(parsed.debug_info.line(3), Some(32));
}

#[test]
fn test_parse_then_sanitize_merges_only_child() {
    let source = "((Axon)
      (0 0 0 1)
      (0 1 0 1)
      (
        (0 2 0 1)
        (0 3 0 1)
      )
    )";
    let mut parsed = parse(source, &ParseConfig::default()).expect("Failed to parse");
    parsed.morphology.sanitize(&parsed.debug_info).unwrap();

    let morphology = &parsed.morphology;
    assert_eq!(morphology.section_count(), 1);
    assert_eq!(morphology.section(0).unwrap().points().len(), 4);

    let warning = morphology
        .diagnostics()
        .iter()
        .find(|diag| diag.warning_kind() == Some(WarningKind::OnlyChild))
        .expect("only child warning");
    assert_eq!(warning.line(), Some(5));
}

#[test]
fn test_ignore_set_applies_to_sanitize() {
    let source = "((Axon) (0 0 0 1) (0 1 0 1) ((0 2 0 1)))";
    let config: ParseConfig = [WarningKind::OnlyChild].into_iter().collect();
    let mut parsed = parse(source, &config).expect("Failed to parse");
    parsed.morphology.sanitize(&parsed.debug_info).unwrap();

    assert_eq!(parsed.morphology.section_count(), 1);
    assert!(parsed.morphology.diagnostics().is_empty());
}

#[test]
fn test_duplicate_soma_returns_no_morphology() {
    let source = "((CellBody) (0 0 0 1))\n((Axon) (0 0 0 1) (1 0 0 1))\n((CellBody) (0 0 0 1))";
    let err = parse(source, &ParseConfig::default()).unwrap_err();

    let primary = err.primary().unwrap();
    assert_eq!(primary.code(), Some(ErrorCode::E201));
    assert_eq!(primary.line(), Some(3));
    assert_eq!(primary.to_string(), "<input>:3: error[E201]: a soma is already defined");
}

#[test]
fn test_public_tokenize() {
    let tokens = tokenize("(Axon)").unwrap();
    let kinds: Vec<Token<'_>> = tokens.into_iter().map(|t| t.token).collect();

    assert_eq!(
        kinds,
        vec![Token::LeftParen, Token::Axon, Token::RightParen, Token::Eof]
    );
}

mod proptest_tests {
    use proptest::prelude::*;

    use arbor_core::types::points_equal;
    use arbor_parser::{ParseConfig, parse};

    #[derive(Debug, Clone)]
    struct Branch {
        points: usize,
        children: Vec<Branch>,
    }

    impl Branch {
        fn count(&self) -> usize {
            1 + self.children.iter().map(Branch::count).sum::<usize>()
        }
    }

    fn branch_strategy() -> impl Strategy<Value = Branch> {
        let leaf = (1usize..4).prop_map(|points| Branch {
            points,
            children: Vec::new(),
        });
        leaf.prop_recursive(4, 32, 2, |inner| {
            (1usize..4, prop::collection::vec(inner, 2..=2))
                .prop_map(|(points, children)| Branch { points, children })
        })
    }

    /// Points are numbered globally so no child starts on its parent's last
    /// point. The diameter encodes the depth.
    fn render(branch: &Branch, depth: usize, next: &mut usize, out: &mut String) {
        for _ in 0..branch.points {
            out.push_str(&format!("({} {} 0 {})\n", *next, depth, depth + 1));
            *next += 1;
        }
        if branch.children.is_empty() {
            return;
        }
        out.push_str("(\n");
        for (i, child) in branch.children.iter().enumerate() {
            if i > 0 {
                out.push_str("|\n");
            }
            render(child, depth + 1, next, out);
        }
        out.push_str(")\n");
    }

    fn document(branch: &Branch) -> String {
        let mut out = String::from("((Dendrite)\n");
        render(branch, 0, &mut 0, &mut out);
        out.push_str(")\n");
        out
    }

    /// Children start on their parent's last point, with their own diameter.
    fn check_children_are_reconciled(branch: &Branch) -> Result<(), TestCaseError> {
        let parsed = parse(&document(branch), &ParseConfig::default())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let morphology = parsed.morphology;

        prop_assert_eq!(morphology.section_count(), branch.count());
        for section in morphology.sections() {
            let Some(parent) = morphology.parent(section.id()) else {
                continue;
            };
            let parent = morphology.section(parent).unwrap();
            let last = parent.points().last().unwrap();

            prop_assert!(points_equal(&section.points()[0], last));
            prop_assert!(section.points().len() >= 2);
            prop_assert_eq!(section.diameters()[0], section.diameters()[1]);
            prop_assert!(section.diameters()[0] > *parent.diameters().last().unwrap());
        }
        Ok(())
    }

    /// Sections are created in document order, which is depth-first order.
    fn check_ids_follow_document_order(branch: &Branch) -> Result<(), TestCaseError> {
        let parsed = parse(&document(branch), &ParseConfig::default())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let morphology = parsed.morphology;

        let order: Vec<u32> = morphology.depth_iter(None).collect();
        let expected: Vec<u32> = (0..morphology.section_count() as u32).collect();
        prop_assert_eq!(order, expected);

        for section in morphology.sections() {
            if let Some(parent) = morphology.parent(section.id()) {
                prop_assert!(parent < section.id());
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn children_are_reconciled(branch in branch_strategy()) {
            check_children_are_reconciled(&branch)?;
        }

        #[test]
        fn ids_follow_document_order(branch in branch_strategy()) {
            check_ids_follow_document_order(&branch)?;
        }
    }
}
