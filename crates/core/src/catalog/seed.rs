use crate::model::{
    Course, CourseId, Difficulty, LearningPath, Lesson, PathStage, Problem, ProblemExample,
    ProblemId, ProblemSolution, RoadmapStep,
};

const UNSPLASH_SUFFIX: &str = "?auto=format&fit=crop&w=1470&q=80";

fn image(photo: &str) -> String {
    format!("https://images.unsplash.com/{photo}{UNSPLASH_SUFFIX}")
}

pub(crate) fn courses() -> Vec<Course> {
    vec![
        Course::new(
            "react-fundamentals",
            "React Fundamentals",
            vec![
                Lesson::new("l1", "Introduction to React", 15),
                Lesson::new("l2", "Components and Props", 30),
                Lesson::new("l3", "State and Lifecycle", 45),
                Lesson::new("l4", "Handling Events", 25),
                Lesson::new("l5", "Introduction to Hooks", 60),
            ],
        )
        .with_description(
            "Master the fundamentals of React 18, including hooks, components, and state management.",
            "A deep dive into the core concepts of React: JSX, component lifecycle, state and \
             props, events, conditional rendering, lists and keys, and the essential hooks.",
        )
        .with_instructor("Jane Doe")
        .with_tags(["React", "Frontend", "JavaScript"])
        .with_image(image("photo-1633356122544-f134324a6cee"))
        .with_outcomes([
            "Build dynamic user interfaces with React components.",
            "Manage application state effectively using React Hooks.",
            "Understand the React component lifecycle.",
            "Create and style components using modern techniques.",
        ]),
        Course::new(
            "advanced-typescript",
            "Advanced TypeScript",
            vec![
                Lesson::new("l1", "Generics Deep Dive", 50),
                Lesson::new("l2", "Utility Types", 40),
                Lesson::new("l3", "Decorators and Metadata", 60),
                Lesson::new("l4", "Advanced Type Inference", 35),
            ],
        )
        .with_description(
            "Explore advanced TypeScript features like generics, decorators, and mapped types.",
            "For developers comfortable with TypeScript basics: generics, utility types, \
             decorators, mapped and conditional types, and framework integration.",
        )
        .with_instructor("John Smith")
        .with_tags(["TypeScript", "Programming", "Web Dev"])
        .with_image(image("photo-1599507593499-a3f7d7d97667"))
        .with_outcomes([
            "Utilize generics to create reusable and type-safe components.",
            "Master advanced TypeScript features like conditional types and decorators.",
            "Improve code quality and maintainability in large projects.",
            "Integrate TypeScript effectively with backend and frontend frameworks.",
        ]),
        Course::new(
            "ai-integration",
            "AI Integration with Gemini",
            vec![
                Lesson::new("l1", "Introduction to Gemini API", 20),
                Lesson::new("l2", "Text Generation and Prompts", 45),
                Lesson::new("l3", "Multimodal Capabilities", 55),
                Lesson::new("l4", "Building an AI Chatbot", 70),
            ],
        )
        .with_description(
            "Learn how to integrate the powerful Gemini API into your web applications for amazing features.",
            "Text generation, summarization, function calling and multimodal interactions, \
             built up through mini-projects such as a chatbot and a content generator.",
        )
        .with_instructor("Alex Ray")
        .with_tags(["AI", "Gemini API", "Node.js"])
        .with_image(image("photo-1677756119517-756a188d2d94"))
        .with_outcomes([
            "Understand the fundamentals of the Gemini API.",
            "Implement text generation and content creation features.",
            "Work with multimodal inputs like images and text.",
            "Build a practical, AI-powered application from scratch.",
        ]),
        Course::new(
            "data-structures",
            "Data Structures & Algorithms",
            vec![
                Lesson::new("l1", "Arrays and Linked Lists", 60),
                Lesson::new("l2", "Stacks and Queues", 45),
                Lesson::new("l3", "Trees and Graphs", 90),
                Lesson::new("l4", "Sorting Algorithms", 75),
            ],
        )
        .with_description(
            "A comprehensive guide to common data structures and algorithms using JavaScript.",
            "Arrays, linked lists, stacks, queues, trees, graphs and hash tables, plus sorting, \
             searching and recursion, each with worked examples.",
        )
        .with_instructor("Emily White")
        .with_tags(["Algorithms", "Data Structures", "CS Fundamentals"])
        .with_image(image("photo-1554415707-6e8cfc93fe23"))
        .with_outcomes([
            "Implement common data structures from scratch.",
            "Analyze the time and space complexity of algorithms.",
            "Solve common coding interview problems.",
            "Write more efficient and performant code.",
        ]),
    ]
}

fn course_step(id: &str, title: &str, description: &str, course: &str) -> RoadmapStep {
    RoadmapStep::new(id, title, description, Some(CourseId::new(course)))
}

pub(crate) fn learning_paths() -> Vec<LearningPath> {
    vec![
        LearningPath::new(
            "frontend-developer",
            "Frontend Developer Path",
            "The complete path to becoming a proficient frontend developer, starting with the \
             fundamentals and moving to advanced frameworks.",
            "Approx. 3 Months",
            vec![
                PathStage::new(
                    "Stage 1: Core Frontend",
                    vec![course_step(
                        "fe-s1-1",
                        "React Fundamentals",
                        "Master the fundamentals of React 18.",
                        "react-fundamentals",
                    )],
                ),
                PathStage::new(
                    "Stage 2: Advanced Development",
                    vec![course_step(
                        "fe-s2-1",
                        "Advanced TypeScript",
                        "Explore generics, decorators, and mapped types.",
                        "advanced-typescript",
                    )],
                ),
                PathStage::new(
                    "Stage 3: AI Integration",
                    vec![course_step(
                        "fe-s3-1",
                        "AI Integration with Gemini",
                        "Integrate the Gemini API into your web applications.",
                        "ai-integration",
                    )],
                ),
            ],
        ),
        LearningPath::new(
            "cs-fundamentals",
            "Computer Science Fundamentals",
            "Strengthen your core computer science knowledge with this path focused on data \
             structures, algorithms, and theory.",
            "Approx. 2 Months",
            vec![
                PathStage::new(
                    "Stage 1: Core Concepts",
                    vec![course_step(
                        "cs-s1-1",
                        "Data Structures & Algorithms",
                        "Common data structures and algorithms using JavaScript.",
                        "data-structures",
                    )],
                ),
                PathStage::new(
                    "Stage 2: Advanced Application",
                    vec![course_step(
                        "cs-s2-1",
                        "Advanced TypeScript",
                        "Explore generics, decorators, and mapped types.",
                        "advanced-typescript",
                    )],
                ),
            ],
        ),
    ]
}

const C_TEMPLATE: &str = "#include <stdio.h>\n\nint main() {\n    // Write your solution here\n    return 0;\n}";

pub(crate) fn problems() -> Vec<Problem> {
    vec![
        Problem {
            id: ProblemId::new(1),
            title: "Simple I/O and Arithmetic".into(),
            difficulty: Difficulty::Easy,
            language: "C".into(),
            tags: vec!["fundamentals".into(), "I/O".into()],
            statement: "Write a C program that prompts the user to enter two integers, \
                        calculates their sum and product, and prints the results."
                .into(),
            examples: vec![ProblemExample::new("15\n7", "Sum: 22\nProduct: 105")],
            constraints: vec![
                "Inputs will be standard integers.".into(),
                "Use scanf() for input and printf() for output.".into(),
            ],
            solution: ProblemSolution {
                code: "#include <stdio.h>\n\nint main() {\n    int num1, num2;\n    \
                       scanf(\"%d\", &num1);\n    scanf(\"%d\", &num2);\n    \
                       printf(\"Sum: %d\\n\", num1 + num2);\n    \
                       printf(\"Product: %d\\n\", num1 * num2);\n    return 0;\n}"
                    .into(),
                explanation: "Uses printf() for output and scanf() for input; the core logic \
                              is simple addition and multiplication."
                    .into(),
            },
            template_code: C_TEMPLATE.into(),
        },
        Problem {
            id: ProblemId::new(2),
            title: "Even/Odd Check".into(),
            difficulty: Difficulty::Easy,
            language: "C".into(),
            tags: vec!["conditionals".into(), "math".into()],
            statement: "Write a C program that takes an integer input from the user and \
                        determines whether the number is even or odd."
                .into(),
            examples: vec![
                ProblemExample::new("42", "The number 42 is Even."),
                ProblemExample::new("17", "The number 17 is Odd."),
            ],
            constraints: vec![
                "The input will be a standard C integer.".into(),
                "The logic must use the modulus operator (%).".into(),
            ],
            solution: ProblemSolution {
                code: "#include <stdio.h>\n\nint main() {\n    int num;\n    \
                       scanf(\"%d\", &num);\n    if (num % 2 == 0) {\n        \
                       printf(\"The number %d is Even.\\n\", num);\n    } else {\n        \
                       printf(\"The number %d is Odd.\\n\", num);\n    }\n    return 0;\n}"
                    .into(),
                explanation: "A number with remainder 0 when divided by 2 is even; otherwise \
                              it is odd. An if-else statement handles the decision."
                    .into(),
            },
            template_code: C_TEMPLATE.into(),
        },
        Problem {
            id: ProblemId::new(3),
            title: "Two Sum".into(),
            difficulty: Difficulty::Easy,
            language: "Python".into(),
            tags: vec!["arrays".into(), "hash-table".into()],
            statement: "Given an array of integers `nums` and an integer `target`, return \
                        indices of the two numbers such that they add up to `target`."
                .into(),
            examples: vec![ProblemExample::new(
                "nums = [2, 7, 11, 15], target = 9",
                "[0, 1]",
            )],
            constraints: vec![
                "Each input would have exactly one solution.".into(),
                "You may not use the same element twice.".into(),
            ],
            solution: ProblemSolution {
                code: "def twoSum(nums, target):\n    num_map = {}\n    \
                       for i, num in enumerate(nums):\n        complement = target - num\n        \
                       if complement in num_map:\n            \
                       return [num_map[complement], i]\n        num_map[num] = i"
                    .into(),
                explanation: "A hash map stores seen numbers and their indices; for each \
                              number, look up its complement. O(n) time."
                    .into(),
            },
            template_code: "def twoSum(nums, target):\n    # Write your solution here\n    pass"
                .into(),
        },
    ]
}
