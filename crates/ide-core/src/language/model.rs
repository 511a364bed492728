//! Language catalog.

use serde::Serialize;

/// Language selected when nothing has been persisted yet.
pub const DEFAULT_LANGUAGE_ID: &str = "javascript";

/// Runtime name and version understood by the execution sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Runtime {
    pub language: &'static str,
    pub version: &'static str,
}

/// A language the editor can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageConfig {
    /// Stable id used in storage keys and snippet records
    pub id: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Sandbox runtime used to execute code in this language
    pub runtime: Runtime,
    /// Program loaded into an empty buffer
    pub starter_code: &'static str,
}

const fn language(
    id: &'static str,
    label: &'static str,
    runtime_language: &'static str,
    version: &'static str,
    starter_code: &'static str,
) -> LanguageConfig {
    LanguageConfig {
        id,
        label,
        runtime: Runtime {
            language: runtime_language,
            version,
        },
        starter_code,
    }
}

/// All supported languages, in display order.
pub const LANGUAGES: &[LanguageConfig] = &[
    language(
        "javascript",
        "JavaScript",
        "javascript",
        "18.15.0",
        "const numbers = [1, 2, 3, 4, 5];\n\
         const squares = numbers.map((n) => n * n);\n\
         console.log(\"Squares:\", squares);\n",
    ),
    language(
        "python",
        "Python",
        "python",
        "3.10.0",
        "numbers = [1, 2, 3, 4, 5]\n\
         squares = [n * n for n in numbers]\n\
         print(f\"Squares: {squares}\")\n",
    ),
    language(
        "java",
        "Java",
        "java",
        "15.0.2",
        "public class Main {\n    \
         public static void main(String[] args) {\n        \
         System.out.println(\"Hello, Java!\");\n    \
         }\n\
         }\n",
    ),
    language(
        "cpp",
        "C++",
        "cpp",
        "10.2.0",
        "#include <iostream>\n\n\
         int main() {\n    \
         std::cout << \"Hello, C++!\" << std::endl;\n    \
         return 0;\n\
         }\n",
    ),
    language(
        "csharp",
        "C#",
        "csharp",
        "6.12.0",
        "using System;\n\n\
         class Program {\n    \
         static void Main() {\n        \
         Console.WriteLine(\"Hello, C#!\");\n    \
         }\n\
         }\n",
    ),
    language(
        "go",
        "Go",
        "go",
        "1.18.0",
        "package main\n\n\
         import \"fmt\"\n\n\
         func main() {\n    \
         fmt.Println(\"Hello, Go!\")\n\
         }\n",
    ),
    language(
        "rust",
        "Rust",
        "rust",
        "1.58.0",
        "fn main() {\n    \
         let squares: Vec<i32> = (1..=5).map(|n| n * n).collect();\n    \
         println!(\"Squares: {:?}\", squares);\n\
         }\n",
    ),
    language(
        "ruby",
        "Ruby",
        "ruby",
        "3.0.1",
        "squares = [1, 2, 3, 4, 5].map { |n| n * n }\n\
         puts \"Squares: #{squares}\"\n",
    ),
    language(
        "typescript",
        "TypeScript",
        "typescript",
        "4.2.3",
        "const greet = (name: string): string => `Hello, ${name}!`;\n\
         console.log(greet(\"TypeScript\"));\n",
    ),
    language(
        "swift",
        "Swift",
        "swift",
        "5.3.3",
        "let squares = [1, 2, 3, 4, 5].map { $0 * $0 }\n\
         print(\"Squares: \\(squares)\")\n",
    ),
];

/// Looks up a language by id.
pub fn find_language(id: &str) -> Option<&'static LanguageConfig> {
    LANGUAGES.iter().find(|lang| lang.id == id)
}

/// Returns the default language.
pub fn default_language() -> &'static LanguageConfig {
    &LANGUAGES[0]
}
