//! Synthetic corpora substituted when a data file is unavailable.
//! A demo/test affordance: keeps the pipeline exercisable without real exports.

use chrono::{Duration, NaiveDate};

use crate::models::{EventRecord, JobRecord, RemoteOption};

struct SampleJob {
    title: &'static str,
    company: &'static str,
    location: &'static str,
    description: &'static str,
    experience: &'static str,
    skills: &'static str,
    job_type: &'static str,
    remote: bool,
    salary: &'static str,
    posted: (i32, u32, u32),
}

const SAMPLE_JOBS: &[SampleJob] = &[
    SampleJob {
        title: "Senior Software Engineer",
        company: "TechCorp",
        location: "Bangalore",
        description: "Looking for a senior software engineer with 5+ years of experience in Java, Spring Boot, and microservices architecture.",
        experience: "5+ years",
        skills: "Java, Spring Boot, Microservices, AWS",
        job_type: "Full-time",
        remote: true,
        salary: "20-30 LPA",
        posted: (2023, 8, 1),
    },
    SampleJob {
        title: "Data Scientist",
        company: "DataWorks",
        location: "Mumbai",
        description: "Data scientist position requiring expertise in Python, machine learning, and statistics. Experience with NLP is a plus.",
        experience: "3-5 years",
        skills: "Python, Machine Learning, Statistics, NLP",
        job_type: "Full-time",
        remote: true,
        salary: "15-25 LPA",
        posted: (2023, 8, 2),
    },
    SampleJob {
        title: "Product Manager",
        company: "ProductInc",
        location: "Delhi",
        description: "Product manager role for a SaaS platform. Should have experience in agile methodologies and product lifecycle management.",
        experience: "4-6 years",
        skills: "Agile, Product Management, JIRA, User Stories",
        job_type: "Full-time",
        remote: false,
        salary: "18-28 LPA",
        posted: (2023, 8, 3),
    },
    SampleJob {
        title: "UI/UX Designer",
        company: "DesignHub",
        location: "Hyderabad",
        description: "UI/UX designer for mobile applications. Experience with Figma and Adobe XD required.",
        experience: "2-4 years",
        skills: "UI/UX, Figma, Adobe XD, Wireframing",
        job_type: "Full-time",
        remote: true,
        salary: "12-18 LPA",
        posted: (2023, 8, 4),
    },
    SampleJob {
        title: "Marketing Manager",
        company: "MarketingPro",
        location: "Chennai",
        description: "Marketing manager for digital campaigns. Experience in social media marketing and analytics required.",
        experience: "5-7 years",
        skills: "Digital Marketing, Social Media, Analytics, Content Strategy",
        job_type: "Full-time",
        remote: false,
        salary: "15-22 LPA",
        posted: (2023, 8, 5),
    },
    SampleJob {
        title: "HR Manager",
        company: "PeopleFirst",
        location: "Pune",
        description: "HR manager role focusing on talent acquisition and employee engagement.",
        experience: "6-8 years",
        skills: "Talent Acquisition, Employee Engagement, HR Policies",
        job_type: "Full-time",
        remote: false,
        salary: "18-25 LPA",
        posted: (2023, 8, 6),
    },
    SampleJob {
        title: "Finance Analyst",
        company: "FinanceWorld",
        location: "Kolkata",
        description: "Finance analyst position requiring expertise in financial modeling and data analysis.",
        experience: "2-3 years",
        skills: "Financial Modeling, Excel, Data Analysis, Forecasting",
        job_type: "Full-time",
        remote: true,
        salary: "10-15 LPA",
        posted: (2023, 8, 7),
    },
    SampleJob {
        title: "Business Development Executive",
        company: "GrowthPartners",
        location: "Bangalore",
        description: "Business development executive for expanding market reach. Experience in sales and negotiation required.",
        experience: "3-5 years",
        skills: "Sales, Negotiation, Market Research, Client Relationship",
        job_type: "Full-time",
        remote: false,
        salary: "12-18 LPA",
        posted: (2023, 8, 8),
    },
    SampleJob {
        title: "Content Writer",
        company: "ContentKing",
        location: "Mumbai",
        description: "Content writer for technical blog posts and documentation. Knowledge of SEO best practices required.",
        experience: "1-3 years",
        skills: "Content Writing, SEO, Technical Documentation, Blogging",
        job_type: "Contract",
        remote: true,
        salary: "8-12 LPA",
        posted: (2023, 8, 9),
    },
    SampleJob {
        title: "Operations Manager",
        company: "OperateWell",
        location: "Delhi",
        description: "Operations manager for streamlining internal processes. Experience in process optimization required.",
        experience: "5-8 years",
        skills: "Process Optimization, Team Management, Resource Planning",
        job_type: "Full-time",
        remote: false,
        salary: "15-25 LPA",
        posted: (2023, 8, 10),
    },
];

/// (name, type, location, speaker, description, days after today)
const SAMPLE_EVENTS: &[(&str, &str, &str, &str, &str, i64)] = &[
    (
        "Women in Tech Leadership Summit",
        "Conference",
        "Bangalore",
        "Priya Sharma",
        "Engineering and product leaders share how they grew into leadership roles in technology.",
        5,
    ),
    (
        "Restart: Returning to Work After a Career Break",
        "Workshop",
        "Online",
        "Anita Desai",
        "Practical steps for updating skills, resumes and networks after a career break.",
        9,
    ),
    (
        "Data Science Career Pathways",
        "Webinar",
        "Online",
        "Meera Iyer",
        "How to move into data science and machine learning roles, with a live portfolio review.",
        14,
    ),
    (
        "Negotiating Your Salary with Confidence",
        "Workshop",
        "Mumbai",
        "Kavita Rao",
        "Research-backed negotiation techniques for offers, raises and promotions.",
        21,
    ),
    (
        "Mentorship Circle: Product Management",
        "Mentorship",
        "Delhi",
        "Sunita Menon",
        "Small-group mentoring for aspiring and early-career product managers.",
        28,
    ),
    (
        "Founders Bootcamp for Women Entrepreneurs",
        "Bootcamp",
        "Hyderabad",
        "Lakshmi Nair",
        "Fundraising, go-to-market and hiring for first-time founders.",
        35,
    ),
];

pub fn sample_jobs() -> Vec<JobRecord> {
    SAMPLE_JOBS
        .iter()
        .enumerate()
        .map(|(i, job)| JobRecord {
            job_id: (i + 1).to_string(),
            job_title: job.title.to_string(),
            company_name: job.company.to_string(),
            location: job.location.to_string(),
            job_type: job.job_type.to_string(),
            remote_option: RemoteOption::from(job.remote),
            salary_range: job.salary.to_string(),
            experience_required: job.experience.to_string(),
            skills_required: job.skills.to_string(),
            job_description: job.description.to_string(),
            posted_date: NaiveDate::from_ymd_opt(job.posted.0, job.posted.1, job.posted.2),
        })
        .collect()
}

/// Sample events are dated relative to `today` so the upcoming listing is never stale.
pub fn sample_events(today: NaiveDate) -> Vec<EventRecord> {
    SAMPLE_EVENTS
        .iter()
        .enumerate()
        .map(
            |(i, (name, event_type, location, speaker, description, days))| EventRecord {
                event_id: (i + 1).to_string(),
                name: name.to_string(),
                date: today + Duration::days(*days),
                event_type: event_type.to_string(),
                location: location.to_string(),
                speaker: speaker.to_string(),
                description: description.to_string(),
            },
        )
        .collect()
}
