use serde::Serialize;

pub const AUTOMATED_SECTIONS: [(&str, &str); 5] = [
    ("1", "Build & Infrastructure"),
    ("2", "On-Page SEO"),
    ("3", "Structured Data & Schema"),
    ("4", "Internal Linking & Architecture"),
    ("5", "Content Quality"),
];

#[derive(Debug, Clone, Serialize)]
pub struct ManualSection {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub items: &'static [&'static str],
}

impl ManualSection {
    pub fn item_key(&self, index: usize) -> String {
        format!("{}.{}", self.id, index)
    }
}

pub const MANUAL_SECTIONS: &[ManualSection] = &[
    ManualSection {
        id: "6",
        title: "Performance & Core Web Vitals",
        description: "Run Lighthouse and PageSpeed Insights on 5 representative pages.",
        items: &[
            "Lighthouse Performance >= 90 on all 5 pages",
            "Lighthouse Accessibility >= 90 on all 5 pages",
            "Lighthouse Best Practices >= 90 on all 5 pages",
            "Lighthouse SEO >= 95 on all 5 pages",
            "LCP < 2.5s on all tested pages",
            "CLS < 0.1 on all tested pages",
            "No render-blocking resources flagged",
            "No console errors in DevTools",
        ],
    },
    ManualSection {
        id: "7",
        title: "Structured Data Validation (Tools)",
        description: "Use Google Rich Results Test and Schema.org Validator.",
        items: &[
            "Zero errors in Google Rich Results Test (8 URLs)",
            "Product pages eligible for Product rich results",
            "FAQ pages eligible for FAQ rich results",
            "Breadcrumbs detected on all pages",
            "Schema.org Validator: zero errors",
            "Social preview shows correct title/image",
        ],
    },
    ManualSection {
        id: "8",
        title: "Security & Headers",
        description: "Check the security headers grade and SSL/HTTPS.",
        items: &[
            "Security headers grade A or A+",
            "All security headers present (CSP, HSTS, X-Frame-Options, etc.)",
            "HTTPS on all pages",
            "HTTP redirects to HTTPS",
            "No mixed content warnings",
            "CSP allows newsletter form submission",
            "CSP allows web fonts",
            "No CSP violation errors in console",
        ],
    },
    ManualSection {
        id: "9",
        title: "Accessibility",
        description: "Test keyboard navigation, visual accessibility, screen reader.",
        items: &[
            "Tab reaches all interactive elements",
            "Focus indicators visible",
            "Skip navigation link works",
            "No keyboard traps",
            "Mobile menu is keyboard-accessible",
            "Text readable at 320px to 1920px",
            "Content usable at 200% browser zoom",
            "prefers-reduced-motion disables animations",
            "Color is not sole means of info",
            "Button text is readable on all backgrounds",
        ],
    },
    ManualSection {
        id: "10",
        title: "Robots, Sitemap & Crawl Readiness",
        description: "Verify robots.txt, sitemap, llms.txt, and 404 handling.",
        items: &[
            "robots.txt accessible and correct",
            "Sitemap accessible with all URLs",
            "Sitemap URLs match canonical URLs",
            "llms.txt accessible with all pages listed",
            "Custom 404 page with proper 404 status code",
            "AI crawlers explicitly allowed in robots.txt",
        ],
    },
    ManualSection {
        id: "11",
        title: "Images & Media",
        description: "Verify product photos, editorial images, and responsive variants.",
        items: &[
            "Every product has a hero image",
            "Product images render with their CSS mask",
            "All images have 3 responsive variants",
            "Editorial images render full-width cover",
            "No SVG placeholders remaining on any page",
            "All images in WebP format",
            "All images have descriptive alt text",
            "Image file sizes < 200KB",
        ],
    },
    ManualSection {
        id: "12",
        title: "Google Search Console",
        description: "Submit the site to Search Console and monitor indexing progress.",
        items: &[
            "Site live at production URL",
            "DNS fully propagated",
            "Search Console property added and verified",
            "Sitemap submitted with status Success",
            "URL Inspection run on 5 priority pages",
            "Week 1: pages appearing in Indexed",
            "Week 2: majority indexed (>50%)",
            "Week 4: 95%+ indexed",
        ],
    },
];

pub fn automated_title(section_id: &str) -> Option<&'static str> {
    AUTOMATED_SECTIONS
        .iter()
        .find(|(id, _)| *id == section_id)
        .map(|(_, title)| *title)
}

/// True when `key` names an existing manual item (`"<sectionId>.<itemIndex>"`).
pub fn is_manual_key(key: &str) -> bool {
    let Some((section_id, index)) = key.split_once('.') else {
        return false;
    };
    let Ok(index) = index.parse::<usize>() else {
        return false;
    };
    MANUAL_SECTIONS
        .iter()
        .any(|section| section.id == section_id && index < section.items.len())
}
