mod pfm;
