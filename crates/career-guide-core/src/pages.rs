//! Static page content and the company-page carousel.

use crate::routes::Route;

/// Auto-advance period of the carousel, in milliseconds.
pub const CAROUSEL_INTERVAL_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub title: &'static str,
    pub button: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeLink {
    pub label: &'static str,
    pub key: char,
    pub route: Route,
}

pub struct HomePage;

impl HomePage {
    pub const TITLE: &'static str = "Welcome to Career Guide";
    pub const TAGLINE: &'static str = "Discover the ultimate solution for seamless navigation and productivity. Your journey starts here with Guide App.";
    pub const LINKS: [HomeLink; 2] = [
        HomeLink {
            label: "Product Based",
            key: 'p',
            route: Route::ProductCompanies,
        },
        HomeLink {
            label: "Service Based",
            key: 's',
            route: Route::ServiceCompanies,
        },
    ];
}

pub struct AboutPage;

impl AboutPage {
    pub const TITLE: &'static str = "About Career Guide";
    pub const PARAGRAPHS: [&'static str; 2] = [
        "At Career Guide, we are dedicated to empowering your professional journey with seamless navigation and insightful resources.",
        "Our mission is to connect you with the best opportunities in product-based and service-based companies, helping you achieve your career goals with confidence.",
    ];
}

/// Layout shared by the product and service listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyPage {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub slides: &'static [Slide],
    pub paths_heading: &'static str,
    pub career_paths: &'static [Card],
    pub reasons_heading: &'static str,
    pub reasons: &'static [Card],
}

impl CompanyPage {
    /// Content for a company route; `None` for every other route.
    pub fn for_route(route: Route) -> Option<&'static CompanyPage> {
        match route {
            Route::ProductCompanies => Some(&PRODUCT_COMPANIES),
            Route::ServiceCompanies => Some(&SERVICE_COMPANIES),
            _ => None,
        }
    }
}

pub static PRODUCT_COMPANIES: CompanyPage = CompanyPage {
    title: "Product Companies",
    subtitle: "Discover opportunities at leading product-based companies and learn about different career paths.",
    slides: &[
        Slide { title: "Top Tech Companies", button: "Learn More" },
        Slide { title: "Product Development", button: "Explore" },
        Slide { title: "Innovation Hubs", button: "Discover" },
    ],
    paths_heading: "Explore Career Paths",
    career_paths: &[
        Card {
            title: "Software Development",
            description: "Explore opportunities in software development roles at leading product companies.",
        },
        Card {
            title: "Product Management",
            description: "Learn about product management careers and the skills needed to succeed.",
        },
        Card {
            title: "Data Science",
            description: "Discover data science roles and career paths in product companies.",
        },
        Card {
            title: "UX/UI Design",
            description: "Find out about design roles and opportunities in product companies.",
        },
        Card {
            title: "DevOps",
            description: "Explore DevOps careers and the growing demand in product companies.",
        },
        Card {
            title: "Quality Assurance",
            description: "Learn about QA roles and career progression in product companies.",
        },
    ],
    reasons_heading: "Why Choose Product Companies?",
    reasons: &[
        Card {
            title: "Innovation & Growth",
            description: "Product companies are at the forefront of innovation, offering opportunities to work on cutting-edge technologies and solutions that shape the future.",
        },
        Card {
            title: "Career Development",
            description: "With structured career paths and continuous learning opportunities, product companies provide an ideal environment for professional growth.",
        },
        Card {
            title: "Work-Life Balance",
            description: "Many product companies prioritize employee well-being, offering flexible work arrangements and comprehensive benefits packages.",
        },
        Card {
            title: "Impact & Ownership",
            description: "Work on products that directly impact millions of users and take ownership of features that drive business success.",
        },
    ],
};

pub static SERVICE_COMPANIES: CompanyPage = CompanyPage {
    title: "Service Companies",
    subtitle: "Discover opportunities at leading service-based companies and learn about client-facing career paths.",
    slides: &[
        Slide { title: "Global IT Services", button: "Learn More" },
        Slide { title: "Consulting & Delivery", button: "Explore" },
        Slide { title: "Client Projects", button: "Discover" },
    ],
    paths_heading: "Explore Career Paths",
    career_paths: &[
        Card {
            title: "Application Development",
            description: "Build and maintain software for clients across industries at leading service companies.",
        },
        Card {
            title: "Technology Consulting",
            description: "Learn about consulting roles that advise clients on technology strategy and delivery.",
        },
        Card {
            title: "Testing Services",
            description: "Discover testing and quality roles that keep client releases reliable.",
        },
        Card {
            title: "Cloud & Infrastructure",
            description: "Explore infrastructure and cloud migration work for enterprise clients.",
        },
    ],
    reasons_heading: "Why Choose Service Companies?",
    reasons: &[
        Card {
            title: "Breadth of Exposure",
            description: "Work with many clients, domains and technology stacks early in your career.",
        },
        Card {
            title: "Structured Training",
            description: "Service companies run large onboarding and training programs for new graduates.",
        },
    ],
};

/// Index into a fixed list of slides that advances on a timer and can be
/// set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn advance(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn back(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// Jump to slide `index`; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }
}
