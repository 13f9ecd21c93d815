use std::collections::HashMap;

use crate::model::ids::{ProblemId, TopicId};
use crate::model::problem::{Difficulty, Problem};

/// A topic section grouping related problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    name: String,
}

impl Topic {
    #[must_use]
    pub fn new(id: impl Into<TopicId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &TopicId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The static table of topics and problems.
///
/// Read-only after construction. Completion state is never stored here; the
/// catalog only answers "what exists" questions for stats and rendering.
#[derive(Debug, Clone)]
pub struct Catalog {
    topics: Vec<Topic>,
    problems: Vec<Problem>,
    by_id: HashMap<ProblemId, usize>,
}

impl Catalog {
    /// Builds a catalog from explicit topics and problems.
    ///
    /// Problems whose topic is not listed are still kept; they simply render
    /// under no section.
    #[must_use]
    pub fn new(topics: Vec<Topic>, problems: Vec<Problem>) -> Self {
        let by_id = problems
            .iter()
            .enumerate()
            .map(|(idx, problem)| (problem.id().clone(), idx))
            .collect();
        Self {
            topics,
            problems,
            by_id,
        }
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Total number of problems across all topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Looks up a problem by id.
    #[must_use]
    pub fn problem(&self, id: &ProblemId) -> Option<&Problem> {
        self.by_id.get(id).map(|idx| &self.problems[*idx])
    }

    /// Returns true if the id names a problem in this catalog.
    #[must_use]
    pub fn contains(&self, id: &ProblemId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Iterates over the problems belonging to one topic, in catalog order.
    pub fn problems_for_topic<'a>(
        &'a self,
        topic: &'a TopicId,
    ) -> impl Iterator<Item = &'a Problem> {
        self.problems.iter().filter(move |p| p.topic() == topic)
    }

    /// The built-in DSCode practice track.
    #[must_use]
    pub fn builtin() -> Self {
        use Difficulty::{Easy, Hard, Medium};

        let topics = vec![
            Topic::new("python", "Python Fundamentals"),
            Topic::new("numpy", "NumPy & Pandas"),
            Topic::new("stats", "Statistics & Probability"),
            Topic::new("ml", "Machine Learning"),
            Topic::new("dl", "Deep Learning"),
            Topic::new("nlp", "Natural Language Processing"),
            Topic::new("cv", "Computer Vision"),
            Topic::new("sql", "SQL & Databases"),
            Topic::new("fe", "Feature Engineering"),
            Topic::new("mlops", "MLOps & Deployment"),
            Topic::new("genai", "Generative AI"),
            Topic::new("rag", "Retrieval-Augmented Generation"),
            Topic::new("agents", "AI Agents"),
        ];

        let problems = vec![
            Problem::new("py1", "python", Easy, "Python Data Types: Lists, Tuples, Sets, Dictionaries"),
            Problem::new("py2", "python", Easy, "List Comprehensions and Generators"),
            Problem::new("py3", "python", Medium, "Decorators and Context Managers"),
            Problem::new("py4", "python", Hard, "Concurrency with asyncio"),
            Problem::new("np1", "numpy", Easy, "Array Creation and Broadcasting"),
            Problem::new("np2", "numpy", Medium, "Vectorized Operations over DataFrames"),
            Problem::new("np3", "numpy", Medium, "GroupBy, Merge and Pivot Tables"),
            Problem::new("np4", "numpy", Hard, "Memory Layout and Strides"),
            Problem::new("st1", "stats", Easy, "Descriptive Statistics and Distributions"),
            Problem::new("st2", "stats", Medium, "Hypothesis Testing and p-values"),
            Problem::new("st3", "stats", Medium, "Bayesian Inference Basics"),
            Problem::new("st4", "stats", Hard, "Markov Chain Monte Carlo"),
            Problem::new("ml1", "ml", Easy, "Linear Regression from Scratch"),
            Problem::new("ml2", "ml", Medium, "Decision Trees and Random Forests"),
            Problem::new("ml3", "ml", Medium, "Cross-Validation and Model Selection"),
            Problem::new("ml4", "ml", Hard, "Gradient Boosting Internals"),
            Problem::new("dl1", "dl", Easy, "Perceptrons and Activation Functions"),
            Problem::new("dl2", "dl", Medium, "Backpropagation by Hand"),
            Problem::new("dl3", "dl", Medium, "Convolutional Network Architectures"),
            Problem::new("dl4", "dl", Hard, "Training Stability and Normalization"),
            Problem::new("nlp1", "nlp", Easy, "Tokenization and Text Cleaning"),
            Problem::new("nlp2", "nlp", Medium, "Word Embeddings: Word2Vec and GloVe"),
            Problem::new("nlp3", "nlp", Hard, "Transformer Attention Mechanics"),
            Problem::new("cv1", "cv", Easy, "Image Filters and Convolutions"),
            Problem::new("cv2", "cv", Medium, "Object Detection Pipelines"),
            Problem::new("cv3", "cv", Hard, "Image Segmentation Architectures"),
            Problem::new("sql1", "sql", Easy, "Joins, Aggregates and Subqueries"),
            Problem::new("sql2", "sql", Medium, "Window Functions"),
            Problem::new("sql3", "sql", Hard, "Query Plans and Indexing Strategy"),
            Problem::new("fe1", "fe", Easy, "Handling Missing Values"),
            Problem::new("fe2", "fe", Medium, "Encoding Categorical Variables"),
            Problem::new("fe3", "fe", Medium, "Feature Scaling and Selection"),
            Problem::new("ops1", "mlops", Easy, "Experiment Tracking Basics"),
            Problem::new("ops2", "mlops", Medium, "Model Serving and Monitoring"),
            Problem::new("ops3", "mlops", Hard, "Reproducible Training Pipelines"),
            Problem::new("gen1", "genai", Easy, "Prompt Engineering Patterns"),
            Problem::new("gen2", "genai", Medium, "Fine-Tuning vs. In-Context Learning"),
            Problem::new("gen3", "genai", Hard, "Diffusion Model Fundamentals"),
            Problem::new("rag1", "rag", Easy, "Chunking and Embedding Documents"),
            Problem::new("rag2", "rag", Medium, "Vector Search and Reranking"),
            Problem::new("rag3", "rag", Hard, "Evaluation of RAG Pipelines"),
            Problem::new("ag1", "agents", Medium, "Tool Use and Function Calling"),
            Problem::new("ag2", "agents", Medium, "Planning with Graph Traversal"),
            Problem::new("ag3", "agents", Hard, "Multi-Agent Coordination"),
        ];

        Self::new(topics, problems)
    }
}
