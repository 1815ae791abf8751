//! AQ-10 screening questionnaire

use serde::Serialize;

/// One questionnaire item; `id` doubles as the feature column name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub question: &'static str,
    pub description: &'static str,
}

pub const AQ10_QUESTIONS: [Question; 10] = [
    Question {
        id: "A1_Score",
        question: "I often notice small sounds when others do not",
        description: "Do you notice subtle sounds that others might miss?",
    },
    Question {
        id: "A2_Score",
        question: "I usually concentrate more on the whole picture, rather than the small details",
        description: "Do you focus on the overall picture rather than details?",
    },
    Question {
        id: "A3_Score",
        question: "I find it easy to do more than one thing at once",
        description: "Can you easily multitask or handle multiple activities?",
    },
    Question {
        id: "A4_Score",
        question: "If there is an interruption, I can switch back to what I was doing very quickly",
        description: "Can you quickly return to tasks after being interrupted?",
    },
    Question {
        id: "A5_Score",
        question: "I find it easy to 'read between the lines' when someone is talking to me",
        description: "Do you easily understand implied meanings in conversations?",
    },
    Question {
        id: "A6_Score",
        question: "I know how to tell if someone listening to me is getting bored",
        description: "Can you recognize when someone is losing interest?",
    },
    Question {
        id: "A7_Score",
        question: "When I'm reading a story I find it difficult to work out the characters' intentions",
        description: "Do you have difficulty understanding characters' motivations?",
    },
    Question {
        id: "A8_Score",
        question: "I like to collect information about categories of things",
        description: "Do you enjoy collecting detailed information about specific topics?",
    },
    Question {
        id: "A9_Score",
        question: "I find it easy to work out what someone is thinking or feeling by looking at their face",
        description: "Can you easily read emotions from facial expressions?",
    },
    Question {
        id: "A10_Score",
        question: "I find it difficult to work out people's intentions",
        description: "Do you have trouble understanding what people really mean?",
    },
];

/// Column names of the ten question scores, A1_Score..A10_Score
pub fn score_columns() -> impl Iterator<Item = &'static str> {
    AQ10_QUESTIONS.iter().map(|q| q.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let ids: Vec<&str> = score_columns().collect();
        let expected: Vec<String> = (1..=10).map(|i| format!("A{i}_Score")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_serializes_id_question_description() {
        let value = serde_json::to_value(AQ10_QUESTIONS[0]).unwrap();
        assert_eq!(value["id"], "A1_Score");
        assert_eq!(
            value["question"],
            "I often notice small sounds when others do not"
        );
        assert!(value["description"].is_string());
        assert_eq!(value.as_object().unwrap().len(), 3);
    }
}
