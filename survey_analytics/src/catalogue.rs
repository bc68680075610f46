use log::debug;

use crate::config::TabularDataset;

/// A logical subject of analysis, mapped to one question of the survey.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Topic {
    Gender,
    Age,
    Languages,
    ReadinessConfidence,
    ReadinessAnxiety,
    ReadinessConversations,
    ReadinessCloseness,
    ReadinessRelationships,
    ReadinessIndependence,
    ReadinessConflicts,
    AwarenessWarden,
    AwarenessSupportServices,
    AwarenessStudentAffairs,
    AwarenessCollaboration,
    Challenges,
    Excitement,
}

impl Topic {
    pub const ALL: [Topic; 16] = [
        Topic::Gender,
        Topic::Age,
        Topic::Languages,
        Topic::ReadinessConfidence,
        Topic::ReadinessAnxiety,
        Topic::ReadinessConversations,
        Topic::ReadinessCloseness,
        Topic::ReadinessRelationships,
        Topic::ReadinessIndependence,
        Topic::ReadinessConflicts,
        Topic::AwarenessWarden,
        Topic::AwarenessSupportServices,
        Topic::AwarenessStudentAffairs,
        Topic::AwarenessCollaboration,
        Topic::Challenges,
        Topic::Excitement,
    ];

    /// The readiness battery, in questionnaire order.
    pub const READINESS: [Topic; 7] = [
        Topic::ReadinessConfidence,
        Topic::ReadinessAnxiety,
        Topic::ReadinessConversations,
        Topic::ReadinessCloseness,
        Topic::ReadinessRelationships,
        Topic::ReadinessIndependence,
        Topic::ReadinessConflicts,
    ];

    /// The stable key used in configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            Topic::Gender => "gender",
            Topic::Age => "age",
            Topic::Languages => "languages",
            Topic::ReadinessConfidence => "readiness.confidence",
            Topic::ReadinessAnxiety => "readiness.anxiety",
            Topic::ReadinessConversations => "readiness.conversations",
            Topic::ReadinessCloseness => "readiness.closeness",
            Topic::ReadinessRelationships => "readiness.relationships",
            Topic::ReadinessIndependence => "readiness.independence",
            Topic::ReadinessConflicts => "readiness.conflicts",
            Topic::AwarenessWarden => "awareness.warden",
            Topic::AwarenessSupportServices => "awareness.support_services",
            Topic::AwarenessStudentAffairs => "awareness.student_affairs",
            Topic::AwarenessCollaboration => "awareness.collaboration",
            Topic::Challenges => "text.challenges",
            Topic::Excitement => "text.excitement",
        }
    }

    pub fn from_key(key: &str) -> Option<Topic> {
        Topic::ALL.iter().find(|t| t.key() == key).cloned()
    }
}

/// The residence survey question labels, as they appear in the header of the export.
///
/// The labels are matched literally. The "most excited" question carries a
/// leading non-breaking space in the export.
const RESIDENCE_SURVEY_LABELS: [(Topic, &str); 16] = [
    (Topic::Gender, "What is your gender?"),
    (Topic::Age, "What is your age?"),
    (
        Topic::Languages,
        "What language(s) do you primarily speak at home? (Select all that apply)",
    ),
    (
        Topic::ReadinessConfidence,
        "How would you rate your confidence in adapting to a new environment?",
    ),
    (
        Topic::ReadinessAnxiety,
        "How anxious are you about making new friends in the residence?",
    ),
    (
        Topic::ReadinessConversations,
        "Do you find it easy to initiate conversations with new people?",
    ),
    (
        Topic::ReadinessCloseness,
        "How important is it for you to feel close to friends while living in the residence?",
    ),
    (
        Topic::ReadinessRelationships,
        "How confident are you in building long-term relationships with peers in residence?",
    ),
    (
        Topic::ReadinessIndependence,
        "Do you feel prepared to live independently in a new environment?",
    ),
    (
        Topic::ReadinessConflicts,
        "How confident are you in resolving interpersonal conflicts?",
    ),
    (
        Topic::AwarenessWarden,
        "How familiar are you with the role of the residence warden in supporting students during their transition to university?",
    ),
    (
        Topic::AwarenessSupportServices,
        "How aware are you of the different student support services (such as counseling, student health, or academic support) available to assist you during your transition?",
    ),
    (
        Topic::AwarenessStudentAffairs,
        "How well do you know the resources available in student affairs that help students adjust to university life?",
    ),
    (
        Topic::AwarenessCollaboration,
        "How aware are you of how student affairs offices (such as counselling or student health) and the residence warden work together to support new students?",
    ),
    (
        Topic::Challenges,
        "What do you think will be your biggest challenge in transitioning to residence life?",
    ),
    (
        Topic::Excitement,
        "\u{a0}What are you most excited about when thinking of living in the residence?",
    ),
];

/// The mapping from topics to the literal column labels of the export.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnCatalogue {
    labels: Vec<(Topic, String)>,
}

/// The outcome of checking a catalogue against the header of a dataset.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CatalogueCheck {
    pub present: Vec<Topic>,
    pub missing: Vec<Topic>,
}

impl ColumnCatalogue {
    /// A catalogue without any topic.
    pub fn empty() -> ColumnCatalogue {
        ColumnCatalogue { labels: Vec::new() }
    }

    pub fn residence_survey() -> ColumnCatalogue {
        ColumnCatalogue {
            labels: RESIDENCE_SURVEY_LABELS
                .iter()
                .map(|(t, l)| (*t, l.to_string()))
                .collect(),
        }
    }

    /// Sets (or replaces) the column label of a topic.
    pub fn with_label(mut self, topic: Topic, label: &str) -> ColumnCatalogue {
        if let Some(entry) = self.labels.iter_mut().find(|(t, _)| *t == topic) {
            entry.1 = label.to_string();
        } else {
            self.labels.push((topic, label.to_string()));
        }
        self
    }

    /// The configured label for a topic, regardless of any dataset.
    pub fn label(&self, topic: Topic) -> Option<&str> {
        self.labels
            .iter()
            .find(|(t, _)| *t == topic)
            .map(|(_, l)| l.as_str())
    }

    /// The column holding a topic in this dataset, if the dataset has it.
    pub fn resolve<'a>(&'a self, dataset: &TabularDataset, topic: Topic) -> Option<&'a str> {
        let label = self.label(topic)?;
        if dataset.has_column(label) {
            Some(label)
        } else {
            debug!("resolve: topic {:?} not found as {:?}", topic, label);
            None
        }
    }

    /// Checks every configured topic against the header of the dataset.
    pub fn check(&self, dataset: &TabularDataset) -> CatalogueCheck {
        let mut res = CatalogueCheck::default();
        for (topic, _) in self.labels.iter() {
            if self.resolve(dataset, *topic).is_some() {
                res.present.push(*topic);
            } else {
                res.missing.push(*topic);
            }
        }
        res
    }
}
