//! Course document loading, with built-in fallback content.

use reqwest::Client;

use tutor_core::model::{CourseDoc, CourseId, LessonDoc, QuestionDoc, QuizDoc};

use crate::error::CourseDataError;

/// Fetches course documents from `{base_url}/data/{course}.json`.
#[derive(Clone)]
pub struct CourseDataService {
    client: Client,
    base_url: String,
}

impl CourseDataService {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn course_url(&self, course: &CourseId) -> String {
        format!(
            "{}/data/{}.json",
            self.base_url.trim_end_matches('/'),
            course.as_str()
        )
    }

    /// Fetches and parses a course document.
    ///
    /// # Errors
    ///
    /// Returns `CourseDataError` on transport failure, a non-success status,
    /// or an unparsable body.
    pub async fn fetch_course(&self, course: &CourseId) -> Result<CourseDoc, CourseDataError> {
        let response = self.client.get(self.course_url(course)).send().await?;
        if !response.status().is_success() {
            return Err(CourseDataError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    /// Fetches a course document, substituting built-in fallback content when
    /// the fetch fails for any reason.
    pub async fn load_course(&self, course: &CourseId) -> CourseDoc {
        match self.fetch_course(course).await {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(course = course.as_str(), %err, "using fallback course data");
                fallback_course(course)
            }
        }
    }
}

/// Built-in course content served when the document store is unreachable.
/// Known courses get their full lesson lists; unknown courses get no lessons.
/// All fallback courses share the general question pool.
#[must_use]
pub fn fallback_course(course: &CourseId) -> CourseDoc {
    let lessons = fallback_lesson_titles(course)
        .iter()
        .enumerate()
        .map(|(index, title)| LessonDoc {
            id: u32::try_from(index).unwrap_or(u32::MAX) + 1,
            title: (*title).to_owned(),
        })
        .collect();

    CourseDoc {
        course: course.as_str().to_owned(),
        description: String::new(),
        lessons,
        quiz: Some(QuizDoc {
            questions: general_questions(),
        }),
    }
}

fn fallback_lesson_titles(course: &CourseId) -> &'static [&'static str] {
    match course.as_str() {
        "html" => &[
            "Introduction to HTML",
            "HTML Page Structure",
            "Text Formatting & Headings",
            "Links and Images",
            "Lists and Tables",
            "Forms and Inputs",
            "Semantic Tags",
            "Audio & Video Embedding",
            "Iframes and Embedding",
            "HTML5 APIs",
            "Interactive Elements",
            "Mini Project: Portfolio Page",
        ],
        "css" => &[
            "CSS Syntax",
            "Selectors",
            "Colors and Fonts",
            "Box Model",
            "Flexbox",
            "Grid",
            "Backgrounds",
            "Transitions",
            "Animations",
            "Responsive Design",
            "Pseudo-classes",
            "Mini Project",
        ],
        "javascript" => &[
            "Introduction",
            "Variables",
            "Functions",
            "Arrays",
            "DOM",
            "Events",
            "Forms",
            "ES6",
            "LocalStorage",
            "API",
            "Debugging",
            "Mini Project",
        ],
        "python" => &[
            "Introduction",
            "Syntax",
            "Data Types",
            "Control Flow",
            "Loops",
            "Functions",
            "Data Structures",
            "File Handling",
            "Exceptions",
            "OOP",
            "Libraries",
            "Mini Project",
        ],
        _ => &[],
    }
}

fn general_questions() -> Vec<QuestionDoc> {
    fn doc(question: &str, options: [&str; 4], correct: usize) -> QuestionDoc {
        QuestionDoc {
            question: question.to_owned(),
            options: options.iter().map(|s| (*s).to_owned()).collect(),
            correct,
        }
    }

    vec![
        doc(
            "What does HTML stand for?",
            [
                "Hyper Text Markup Language",
                "High Tech Modern Language",
                "Home Tool Markup Language",
                "Hyperlink and Text Markup Language",
            ],
            0,
        ),
        doc(
            "Which HTML tag is used to define an internal style sheet?",
            ["<script>", "<style>", "<css>", "<link>"],
            1,
        ),
        doc(
            "Which property is used to change the background color in CSS?",
            ["color", "bgcolor", "background-color", "backgroundColor"],
            2,
        ),
        doc(
            "How do you declare a variable in JavaScript?",
            [
                "var myVariable;",
                "variable myVariable;",
                "v myVariable;",
                "declare myVariable;",
            ],
            0,
        ),
        doc(
            "Which HTML attribute is used to define inline styles?",
            ["class", "styles", "style", "font"],
            2,
        ),
        doc(
            "What is the correct HTML element for the largest heading?",
            ["<h6>", "<heading>", "<h1>", "<head>"],
            2,
        ),
        doc(
            "Which HTML element is used to specify a footer for a document or section?",
            ["<bottom>", "<footer>", "<section>", "<aside>"],
            1,
        ),
        doc(
            "In CSS, what does the 'box-sizing: border-box;' property do?",
            [
                "Adds a border around the element",
                "Includes padding and border in the element's total width and height",
                "Creates a box shadow around the element",
                "Changes the box model to border-box",
            ],
            1,
        ),
        doc(
            "Which JavaScript method is used to write HTML output?",
            [
                "document.write()",
                "innerHTML()",
                "document.log()",
                "document.output()",
            ],
            0,
        ),
        doc(
            "What is the purpose of the <meta> tag in HTML?",
            [
                "To create metadata about the HTML document",
                "To display text on the page",
                "To create a new section",
                "To add images to the page",
            ],
            0,
        ),
    ]
}
