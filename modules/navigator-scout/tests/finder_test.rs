//! Aggregation pipeline scenarios against fixture searchers. No network.

use std::collections::HashSet;
use std::sync::Arc;

use navigator_common::{Course, Level, NavigatorError, Phase, SearchResult};
use navigator_scout::finder::rank;
use navigator_scout::fixtures::{FixtureSearcher, SilentSearcher};
use navigator_scout::{CourseFinder, LocalCourseStore, SearchRequest};

fn raw(title: &str, snippet: &str, link: &str) -> SearchResult {
    SearchResult::new(title, snippet, link)
}

fn python_scrape_page() -> Vec<SearchResult> {
    vec![
        raw(
            "Introduction to Python",
            "Start coding today. Rated 4.8/5 by 20k learners.",
            "https://www.coursera.org/learn/python-intro",
        ),
        raw(
            "Python for Beginners",
            "No experience needed.",
            "https://www.udemy.com/course/python-for-beginners/",
        ),
        raw(
            "Advanced Python Internals",
            "Metaclasses and the GIL. 4.2 stars.",
            "https://www.pluralsight.com/courses/python-internals",
        ),
        raw(
            "Python Projects Workshop",
            "Build five apps.",
            "https://www.edx.org/course/python-projects",
        ),
        raw(
            "Python Data Analysis",
            "Pandas and NumPy.",
            "https://www.datacamp.com/courses/python-data",
        ),
    ]
}

fn assert_result_properties(courses: &[Course], max_results: usize) {
    assert!(courses.len() <= max_results);

    let keys: HashSet<_> = courses.iter().map(|c| c.dedup_key()).collect();
    assert_eq!(keys.len(), courses.len(), "duplicate identity in results");

    for c in courses {
        assert!((0.0..=5.0).contains(&c.rating), "rating out of range: {}", c.rating);
        assert!(!c.price.is_empty());
        assert!(!c.duration_weeks.is_empty());
        assert!(!c.platform.is_empty());
    }

    for pair in courses.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.rating > b.rating || (a.rating == b.rating && (a.is_foundation() || !b.is_foundation())),
            "{} ({}, {:?}) ranked above {} ({}, {:?})",
            a.name,
            a.rating,
            a.phase,
            b.name,
            b.rating,
            b.phase
        );
    }
}

#[tokio::test]
async fn python_beginner_scrape_only() {
    let scrape = Arc::new(FixtureSearcher::new("scrape", python_scrape_page()));
    let finder = CourseFinder::new(None, Some(scrape.clone()));

    let courses = finder.search("Python Programming", Level::Beginner, 3).await;

    assert_eq!(courses.len(), 3);
    assert_eq!(courses[0].name, "Introduction to Python");
    assert_eq!(courses[0].rating, 4.8);
    assert_eq!(courses[0].phase, Phase::PhaseI);
    assert_eq!(courses[0].platform, "Coursera");

    assert_eq!(courses[1].name, "Advanced Python Internals");
    assert_eq!(courses[1].rating, 4.2);
    assert_eq!(courses[1].phase, Phase::PhaseIII);

    // Among the unrated entries the Phase I course wins the tie.
    assert_eq!(courses[2].name, "Python for Beginners");
    assert_eq!(courses[2].rating, 0.0);
    assert_eq!(courses[2].phase, Phase::PhaseI);

    assert_result_properties(&courses, 3);

    // Scrape adapter got the unrestricted query and was asked to over-fetch.
    assert_eq!(
        scrape.calls(),
        vec![("Python Programming Beginner course".to_string(), 6)]
    );
}

#[tokio::test]
async fn empty_topic_calls_no_adapter() {
    let structured = Arc::new(FixtureSearcher::new("api", python_scrape_page()));
    let scrape = Arc::new(FixtureSearcher::new("scrape", python_scrape_page()));
    let finder = CourseFinder::new(Some(structured.clone()), Some(scrape.clone()));

    assert!(finder.search("", Level::Beginner, 10).await.is_empty());
    assert!(finder.search("   ", Level::Advanced, 10).await.is_empty());
    assert!(matches!(
        finder.try_search(" ", Level::Beginner, 10).await,
        Err(NavigatorError::EmptyTopic)
    ));

    assert_eq!(structured.call_count(), 0);
    assert_eq!(scrape.call_count(), 0);
}

#[tokio::test]
async fn zero_limit_returns_nothing_without_calls() {
    let scrape = Arc::new(FixtureSearcher::new("scrape", python_scrape_page()));
    let finder = CourseFinder::new(None, Some(scrape.clone()));

    assert!(finder.search("Python", Level::Beginner, 0).await.is_empty());
    assert_eq!(scrape.call_count(), 0);
}

#[tokio::test]
async fn sufficient_narrow_query_short_circuits() {
    let structured = Arc::new(FixtureSearcher::new("api", python_scrape_page()));
    let scrape = Arc::new(FixtureSearcher::new("scrape", python_scrape_page()));
    let finder = CourseFinder::new(Some(structured.clone()), Some(scrape.clone()));

    let courses = finder.search("Python", Level::Beginner, 4).await;

    assert_eq!(courses.len(), 4);
    let calls = structured.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("site:coursera.org"));
    assert_eq!(calls[0].1, 4);
    assert_eq!(scrape.call_count(), 0);
}

#[tokio::test]
async fn broadens_then_scrapes_when_short() {
    let structured = Arc::new(
        FixtureSearcher::new("api", Vec::new())
            .route(
                "site:",
                vec![raw(
                    "Accounting Fundamentals",
                    "4.6 stars",
                    "https://www.coursera.org/learn/accounting",
                )],
            )
            .route(
                "Accounting Beginner course",
                vec![
                    raw(
                        "Accounting Fundamentals (mirror)",
                        "4.6 stars",
                        "https://www.coursera.org/learn/accounting",
                    ),
                    raw(
                        "Bookkeeping Basics",
                        "Only $19.99, 3 weeks",
                        "https://www.udemy.com/course/bookkeeping",
                    ),
                ],
            ),
    );
    let scrape = Arc::new(FixtureSearcher::new(
        "scrape",
        vec![
            raw(
                "Bookkeeping Basics",
                "Duplicate of the API hit",
                "https://www.udemy.com/course/bookkeeping",
            ),
            raw(
                "Financial Reporting and Analysis",
                "Audit track available. 4.1 rating",
                "//duckduckgo.example/not-unwrapped",
            ),
        ],
    ));
    let finder = CourseFinder::new(Some(structured.clone()), Some(scrape.clone()));

    let courses = finder.search("Accounting", Level::Beginner, 5).await;

    let names: Vec<&str> = courses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Accounting Fundamentals",
            "Financial Reporting and Analysis",
            "Bookkeeping Basics",
        ]
    );

    let bookkeeping = &courses[2];
    assert_eq!(bookkeeping.price, "$19.99");
    assert_eq!(bookkeeping.duration_weeks, "3weeks");
    assert_eq!(bookkeeping.focus, "Only $19.99, 3 weeks");

    let reporting = &courses[1];
    assert_eq!(reporting.price, "Free");
    assert_eq!(reporting.phase, Phase::PhaseIII);

    assert_eq!(structured.call_count(), 2);
    assert_eq!(scrape.calls(), vec![("Accounting Beginner course".to_string(), 10)]);
    assert_result_properties(&courses, 5);
}

#[tokio::test]
async fn same_course_twice_in_one_batch_keeps_the_rated_copy() {
    let url = "https://www.udemy.com/course/python-course/";
    let scrape = Arc::new(FixtureSearcher::new(
        "scrape",
        vec![
            raw("Python Course", "No details", url),
            raw("Python Course", "Rated 4.8/5", url),
        ],
    ));
    let finder = CourseFinder::new(None, Some(scrape));

    let courses = finder.search("Python", Level::Beginner, 5).await;

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name, "Python Course");
    assert_eq!(courses[0].rating, 4.8);
    assert_result_properties(&courses, 5);
}

#[tokio::test]
async fn silent_sources_degrade_to_empty() {
    let finder = CourseFinder::new(Some(Arc::new(SilentSearcher)), Some(Arc::new(SilentSearcher)));
    assert!(finder.search("Quantum Computing", Level::Advanced, 5).await.is_empty());

    let no_sources = CourseFinder::new(None, None);
    assert!(no_sources.search("Quantum Computing", Level::Advanced, 5).await.is_empty());
}

#[tokio::test]
async fn overrides_only_fill_an_empty_result() {
    let stored = Course {
        name: "Curated Statistics Primer".to_string(),
        platform: "".to_string(),
        focus: String::new(),
        key_topics: String::new(),
        price: String::new(),
        rating: 4.0,
        duration_weeks: String::new(),
        phase: Phase::PhaseI,
        level: Level::Beginner,
        url: String::new(),
    };
    let store = LocalCourseStore::new().with_topic("statistics", vec![stored]);

    let empty = CourseFinder::new(None, Some(Arc::new(SilentSearcher))).with_overrides(store.clone());
    let courses = empty.search("Statistics for Data Science", Level::Beginner, 5).await;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name, "Curated Statistics Primer");
    assert_eq!(courses[0].price, "Varies");
    assert_eq!(courses[0].platform, "Unknown");

    let live = CourseFinder::new(
        None,
        Some(Arc::new(FixtureSearcher::new(
            "scrape",
            vec![raw("Statistics 101", "", "https://www.edx.org/stats")],
        ))),
    )
    .with_overrides(store);
    let courses = live.search("Statistics", Level::Beginner, 5).await;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name, "Statistics 101");
}

#[tokio::test]
async fn mixed_sources_hold_result_properties() {
    let mut page = python_scrape_page();
    page.push(raw("Introduction to Python", "Same course, no link", ""));
    page.push(raw("introduction to python", "Same course, no link", ""));
    page.push(raw("", "Untitled result", "https://example.com/untitled"));
    page.push(raw("Python Bootcamp", "Rated 9.5 stars by fans", "https://bootcamp.io/py"));

    let finder = CourseFinder::new(
        Some(Arc::new(FixtureSearcher::new("api", python_scrape_page()))),
        Some(Arc::new(FixtureSearcher::new("scrape", page))),
    );

    for max in [1, 3, 7, 20] {
        let courses = finder
            .search_request(&SearchRequest::new("Python").level(Level::Intermediate).max_results(max))
            .await;
        assert_result_properties(&courses, max);
        assert!(courses.iter().all(|c| !c.name.is_empty()));
        assert!(courses.iter().all(|c| c.level == Level::Intermediate));

        let reranked = rank(courses.clone());
        assert_eq!(reranked, courses);
    }
}

#[tokio::test]
async fn concurrent_searches_share_nothing() {
    let finder = Arc::new(CourseFinder::new(
        None,
        Some(Arc::new(FixtureSearcher::new("scrape", python_scrape_page()))),
    ));

    let a = {
        let finder = Arc::clone(&finder);
        tokio::spawn(async move { finder.search("Python", Level::Beginner, 2).await })
    };
    let b = {
        let finder = Arc::clone(&finder);
        tokio::spawn(async move { finder.search("Python", Level::Advanced, 5).await })
    };

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 5);
    assert!(b.iter().all(|c| c.level == Level::Advanced));
}
