//! Parser tests against hand-written and degenerate PlantUML input.
mod common;
use common::*;
use flowuml::prelude::*;
use serde_json::json;

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_input() {
        for content in ["", "   \n\t "] {
            let parsed = parse_plantuml_to_flow(content);
            assert_eq!(parsed.nodes.len(), 1);
            let node = &parsed.nodes[0];
            assert_eq!(node.id, "start_node");
            assert_eq!(node.kind, NodeKind::Input);
            assert_eq!(node.position, Position::new(100.0, 100.0));
            assert_eq!(node.label(), "Start");
            assert_eq!(node.data.properties["label"], json!("Input Node"));
            assert!(!parsed.warnings.is_empty());
            assert_eq!(parsed.warnings[0].kind, DiagnosticKind::EmptyDocument);
            assert!(parsed.edges.is_empty());
            assert!(!parsed.has_errors());
        }
    }

    #[test]
    fn test_nothing_recognized_uses_fallback() {
        let parsed = parse_plantuml_to_flow("@startuml\nhexagon \"Unknown\" as hex1\n@enduml");
        assert_eq!(parsed.nodes.len(), 1);
        assert_eq!(parsed.nodes[0].id, "start_node");
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].kind, DiagnosticKind::NoNodesRecognized);
    }

    #[test]
    fn test_malformed_metadata_is_an_error_not_a_panic() {
        let parsed = parse_plantuml_to_flow("'@node-meta {invalid json\n:Do work;");
        assert_eq!(parsed.errors.len(), 1);
        let error = &parsed.errors[0];
        assert!(error.message.contains("metadata"));
        assert_eq!(error.line, Some(1));
        assert!(error.to_string().starts_with("Line 1: "));
        assert!(matches!(error.kind, DiagnosticKind::MalformedMetadata(_)));

        // the statement after it still produces a plain node
        assert_eq!(parsed.nodes.len(), 1);
        assert_eq!(parsed.nodes[0].id, "node_1");
    }

    #[test]
    fn test_malformed_metadata_does_not_leak_earlier_metadata() {
        let parsed = parse_plantuml_to_flow(
            "'@node-meta {\"id\":\"kept\"}\n'@node-meta [1]\n:Do work;",
        );
        assert_eq!(parsed.errors.len(), 1);
        assert!(matches!(
            parsed.errors[0].kind,
            DiagnosticKind::MetadataNotAnObject(_)
        ));
        assert_eq!(parsed.nodes[0].id, "node_1");
    }

    #[test]
    fn test_activity_keyword_mapping() {
        let cases = [
            ("requirements", "input"),
            ("ask", "input"),
            ("learn", "custom-prompt"),
            ("research", "custom-prompt"),
            ("evolve", "instruction"),
            ("update", "instruction"),
            ("build", "command-prompt-file"),
            ("create", "command-prompt-file"),
            ("generate", "command-prompt-file"),
            ("plan", "instruction"),
            ("design", "instruction"),
            ("architecture", "instruction"),
            ("innovate", "custom-prompt"),
            ("analyze", "custom-prompt"),
            ("run", "command-prompt-file"),
            ("execute", "command-prompt-file"),
            ("implement", "command-prompt-file"),
            ("test", "output-formatter"),
            ("document", "output-formatter"),
            ("business", "custom-prompt"),
            ("marketing", "custom-prompt"),
            ("revenue", "custom-prompt"),
            ("launch", "output-formatter"),
            ("market", "output-formatter"),
            ("canvas", "output-formatter"),
            ("pitch", "output-formatter"),
            ("schedule", "injector"),
            ("something else", "instruction"),
        ];
        for (name, expected) in cases {
            let parsed = parse_plantuml_to_flow(&format!(":{};", name));
            assert_eq!(parsed.nodes.len(), 1, "{}", name);
            assert_eq!(parsed.nodes[0].kind.as_str(), expected, "{}", name);
            assert_eq!(parsed.nodes[0].data.extra["activityType"], json!(name));
        }
    }

    #[test]
    fn test_hand_written_activity_diagram() {
        let parsed = parse_plantuml_to_flow(HAND_WRITTEN_DIAGRAM);
        let kinds: Vec<&str> = parsed.nodes.iter().map(|n| n.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "input",
                "input",
                "command-prompt-file",
                "conditional",
                "output-formatter",
                "output"
            ]
        );

        // the diamond is not part of the sequential chain
        let pairs: Vec<(&str, &str)> = parsed
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("node_1", "node_2"),
                ("node_2", "node_3"),
                ("node_3", "node_5"),
                ("node_5", "node_6")
            ]
        );
        assert!(parsed.edges.iter().all(|e| e.data.is_implicit()));
        assert!(parsed.edges.iter().all(|e| e.kind.as_deref() == Some("default")));
    }

    #[test]
    fn test_legacy_component_diagram() {
        let parsed = parse_plantuml_to_flow(LEGACY_DIAGRAM);
        let summary: Vec<(&str, &str)> = parsed
            .nodes
            .iter()
            .map(|n| (n.label(), n.kind.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("User", "input"),
                ("API Gateway", "default"),
                ("Results", "output"),
                ("Remote Model", "default")
            ]
        );
        assert_eq!(parsed.nodes[3].data.alias.as_deref(), Some("remotemodel"));

        // `api --> ghost` names an undeclared alias and is dropped
        assert_eq!(parsed.edges.len(), 3);
        let first = &parsed.edges[0];
        assert_eq!((first.source.as_str(), first.target.as_str()), ("node_1", "node_2"));
        assert_eq!(first.label.as_deref(), Some("request"));
        assert_eq!(first.data.original_label.as_deref(), Some("request"));
        assert_eq!(parsed.edges[1].kind.as_deref(), Some("straight"));
        assert_eq!(parsed.edges[2].target, "node_4");
        assert!(!parsed.edges.iter().any(|e| e.data.is_implicit()));
    }

    #[test]
    fn test_forward_reference_is_dropped() {
        let parsed = parse_plantuml_to_flow("a --> b\nrectangle \"A\" as a\nrectangle \"B\" as b");
        assert_eq!(parsed.nodes.len(), 2);
        assert!(parsed.edges.is_empty());
        assert!(parsed.warnings.is_empty());
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_metadata_id_is_used_for_connections() {
        let parsed = parse_plantuml_to_flow(concat!(
            "'@node-meta {\"id\":\"first-node\"}\n",
            "rectangle \"First\" as one\n",
            "'@node-meta {\"id\":\"second-node\"}\n",
            "rectangle \"Second\" as two\n",
            "one --> two\n"
        ));
        assert_eq!(parsed.edges.len(), 1);
        assert_eq!(parsed.edges[0].source, "first-node");
        assert_eq!(parsed.edges[0].target, "second-node");
    }

    #[test]
    fn test_metadata_applies_to_every_node_statement() {
        let parsed = parse_plantuml_to_flow(concat!(
            "'@node-meta {\"id\":\"entry\",\"position\":{\"x\":1,\"y\":2}}\n",
            "start\n",
            "'@node-meta {\"id\":\"gate\",\"type\":\"loop\"}\n",
            "if (again?) then (yes)\n",
            "'@node-meta {\"id\":\"target\"}\n",
            "label retry\n",
            "'@node-meta {\"id\":\"bare\"}\n",
            "worker\n"
        ));
        let ids: Vec<&str> = parsed.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["entry", "gate", "target", "bare"]);
        assert_eq!(parsed.nodes[0].position, Position::new(1.0, 2.0));
        assert_eq!(parsed.nodes[1].kind, NodeKind::Loop);
        assert_eq!(parsed.nodes[1].data.properties["maxIterations"], json!(10));
        assert_eq!(parsed.nodes[2].data.shape.as_deref(), Some("label"));
        assert_eq!(parsed.nodes[3].data.shape.as_deref(), Some("rectangle"));
    }

    #[test]
    fn test_goto_is_recognized_but_inert() {
        let parsed = parse_plantuml_to_flow("label retry\n:work;\n-> retry;");
        assert_eq!(parsed.nodes.len(), 2);
        assert!(parsed.edges.is_empty());
    }

    #[test]
    fn test_comments_and_directives_are_ignored() {
        let parsed = parse_plantuml_to_flow(
            "@startuml\n!theme plain\n' a comment\nskinparam backgroundColor white\n:Work;\n@enduml",
        );
        assert_eq!(parsed.nodes.len(), 1);
        assert_eq!(parsed.nodes[0].label(), "Work");
    }

    #[test]
    fn test_malformed_workflow_meta_is_a_warning() {
        let parsed = parse_plantuml_to_flow("'@workflow-meta {oops\n:Work;");
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
        assert!(matches!(
            parsed.warnings[0].kind,
            DiagnosticKind::MalformedWorkflowMetadata(_)
        ));
        assert!(parsed.workflow.is_none());
    }

    #[test]
    fn test_parse_is_independent_between_calls() {
        let parser = FlowParser::default();
        let first = parser.parse("'@node-meta {\"id\":\"x\"}");
        let second = parser.parse(":Work;");
        assert_eq!(first.nodes[0].id, "start_node");
        assert_eq!(second.nodes[0].id, "node_1");
    }
}
