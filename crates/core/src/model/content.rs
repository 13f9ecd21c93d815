use crate::model::ids::ProblemId;

/// Study content shown on a problem's detail page.
///
/// Pure lookup table, no state. Problems without dedicated content fall back
/// to a generic placeholder entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicContent {
    pub title: &'static str,
    pub overview: &'static str,
    pub key_concepts: &'static str,
    pub code_example: &'static str,
    pub resources: &'static [(&'static str, &'static str)],
}

const DEFAULT_CONTENT: TopicContent = TopicContent {
    title: "Topic Content",
    overview: "This topic covers important concepts in data science and machine learning. \
               Detailed guides, code examples, and learning resources are being added over time.",
    key_concepts: "Understand the fundamental concepts. Learn best practices and common \
                   patterns. Apply knowledge through hands-on practice. Explore real-world \
                   applications.",
    code_example: "# Example code will be added soon",
    resources: &[
        ("Documentation", "Official documentation and guides"),
        ("Video Tutorials", "Step-by-step video guides"),
        ("Practice Problems", "Hands-on coding exercises"),
    ],
};

const PY1_CONTENT: TopicContent = TopicContent {
    title: "Python Data Types: Lists, Tuples, Sets, Dictionaries",
    overview: "Python provides several built-in data structures that are essential for data \
               science work. Lists are ordered and mutable, tuples are ordered and immutable, \
               sets hold unique elements with fast membership testing, and dictionaries map \
               keys to values with O(1) average lookups.",
    key_concepts: "List methods (append, extend, insert, remove, pop, sort) and slicing; \
                   tuple unpacking and use as dictionary keys; set operations (union, \
                   intersection, difference); dictionary methods (get, keys, values, items) \
                   and comprehensions for all four structures.",
    code_example: "my_list = [1, 2, 3, 4, 5]\n\
                   squares = [x**2 for x in range(5)]\n\
                   x, y, z = (10, 20, 30)\n\
                   print({1, 2, 3, 4} & {3, 4, 5, 6})  # {3, 4}\n\
                   person = {'name': 'Alice', 'age': 30}\n\
                   person['occupation'] = 'Data Scientist'",
    resources: &[
        ("Python Documentation", "Official Python data structures guide"),
        ("Real Python Tutorial", "Comprehensive guide to Python data types"),
        ("Practice on LeetCode", "Array and hashtable problems"),
    ],
};

/// Returns the study content for a problem, falling back to the default
/// entry when no dedicated content exists yet.
#[must_use]
pub fn content_for(id: &ProblemId) -> TopicContent {
    match id.as_str() {
        "py1" => PY1_CONTENT,
        _ => DEFAULT_CONTENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_content_wins_over_default() {
        let content = content_for(&ProblemId::new("py1"));
        assert!(content.title.starts_with("Python Data Types"));
    }

    #[test]
    fn unknown_ids_fall_back_to_default() {
        let content = content_for(&ProblemId::new("zz99"));
        assert_eq!(content.title, "Topic Content");
        assert_eq!(content.resources.len(), 3);
    }
}
